//! snappy-cli - Command-line interface for snappy-bridge
//!
//! A command-line tool for compressing, decompressing and inspecting files in
//! the Snappy raw block format.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use snappy_bridge::{Bridge, BridgeOptions, GrowthPolicy, Outcome};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "snappy-cli")]
#[command(about = "A CLI tool for Snappy compression and decompression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        /// Input file to compress
        input: PathBuf,

        /// Output compressed file
        output: PathBuf,

        /// Minimum number of bytes added per output buffer growth
        #[arg(long, default_value_t = 8192)]
        min_growth: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Decompress a Snappy-compressed file
    Decompress {
        /// Input compressed file
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Refuse to decompress files declaring more than this many bytes
        #[arg(long)]
        max_size: Option<usize>,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the declared uncompressed length of a file
    Length {
        /// Compressed file to inspect
        input: PathBuf,
    },

    /// Check whether a file is a valid compressed buffer
    Validate {
        /// File to check
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            min_growth,
            force,
        } => {
            let options = BridgeOptions::new()
                .with_growth_policy(GrowthPolicy::new().with_min_growth(min_growth));
            compress_file(&input, &output, options, force, cli.verbose, cli.quiet)
        }
        Commands::Decompress {
            input,
            output,
            max_size,
            force,
        } => {
            let mut options = BridgeOptions::new();
            if let Some(limit) = max_size {
                options = options.with_max_uncompressed_len(limit);
            }
            decompress_file(&input, &output, options, force, cli.verbose, cli.quiet)
        }
        Commands::Length { input } => show_length(&input),
        Commands::Validate { input } => validate_file(&input, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check_paths(input: &PathBuf, output: &PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }
    Ok(())
}

fn progress_for(size: usize, quiet: bool, message: &'static str) -> Option<ProgressBar> {
    if quiet || size <= 1024 * 1024 {
        return None;
    }

    let pb = ProgressBar::new(2);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message);
    pb.inc(1);
    Some(pb)
}

/// Turn a failed outcome into a CLI error naming its reason
fn expect_binary(outcome: Outcome, action: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Binary(bytes) => Ok(bytes),
        Outcome::Error(reason) => Err(format!("{} failed: {}", action, reason).into()),
        other => Err(format!("{} failed: unexpected outcome {:?}", action, other).into()),
    }
}

fn compress_file(
    input: &PathBuf,
    output: &PathBuf,
    options: BridgeOptions,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    if verbose {
        println!(
            "Compressing '{}' to '{}'",
            input.display(),
            output.display()
        );
        println!(
            "Sink growth: {}x request, at least {} bytes",
            options.growth_policy().factor(),
            options.growth_policy().min_growth()
        );
    }

    let start_time = Instant::now();
    let input_data = fs::read(input)?;
    let input_size = input_data.len();

    if verbose {
        println!("Input size: {} bytes", input_size);
    }

    let progress = progress_for(input_size, quiet, "Compressing...");

    let bridge = Bridge::with_options(options);
    let compressed_data = expect_binary(bridge.compress(&input_data), "Compression")?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Compression complete");
    }

    fs::write(output, &compressed_data)?;

    let compression_time = start_time.elapsed();
    let output_size = compressed_data.len();
    let compression_ratio = if input_size == 0 {
        100.0
    } else {
        (output_size as f64 / input_size as f64) * 100.0
    };

    if !quiet {
        println!("✓ Compression successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  Ratio:  {:.1}%", compression_ratio);
        println!("  Time:   {:.2?}", compression_time);

        if compression_ratio > 100.0 {
            println!("  Note: File expanded during compression (common for small/random data)");
        }
    }

    Ok(())
}

fn decompress_file(
    input: &PathBuf,
    output: &PathBuf,
    options: BridgeOptions,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    if verbose {
        println!(
            "Decompressing '{}' to '{}'",
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();
    let compressed_data = fs::read(input)?;
    let input_size = compressed_data.len();

    if verbose {
        println!("Compressed size: {} bytes", input_size);
    }

    let progress = progress_for(input_size, quiet, "Decompressing...");

    let bridge = Bridge::with_options(options);
    let decompressed_data = expect_binary(bridge.decompress(&compressed_data), "Decompression")?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Decompression complete");
    }

    fs::write(output, &decompressed_data)?;

    let decompression_time = start_time.elapsed();
    let output_size = decompressed_data.len();

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  Time:   {:.2?}", decompression_time);
    }

    Ok(())
}

fn show_length(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    match Bridge::new().uncompressed_length(&data) {
        Outcome::Length(len) => {
            println!("{}", len);
            Ok(())
        }
        Outcome::Error(reason) => Err(format!("Cannot read length: {}", reason).into()),
        other => Err(format!("Cannot read length: unexpected outcome {:?}", other).into()),
    }
}

fn validate_file(input: &PathBuf, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    match Bridge::new().is_valid(&data) {
        Outcome::Valid(true) => {
            if !quiet {
                println!("✓ '{}' is a valid compressed buffer", input.display());
            }
            Ok(())
        }
        Outcome::Valid(false) => {
            Err(format!("'{}' is not a valid compressed buffer", input.display()).into())
        }
        Outcome::Error(reason) => Err(format!("Validation failed: {}", reason).into()),
        other => Err(format!("Validation failed: unexpected outcome {:?}", other).into()),
    }
}
