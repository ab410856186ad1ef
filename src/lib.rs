//! snappy-bridge - Snappy compression behind a boundary-safe API
//!
//! This crate exposes four synchronous operations over the Snappy raw block
//! format to callers that need one exactly sized, owned buffer per call rather
//! than a streaming interface:
//!
//! - **compress** - the engine pushes output in chunks of its own choosing into
//!   a [`GrowableSink`], which grows by a multiple of each request and is
//!   trimmed to its exact length at the end
//! - **decompress** - the declared length is read first, the output is
//!   allocated once, and the payload is decoded into it
//! - **uncompressed_length** - reads only the length preamble
//! - **is_valid** - checks the whole buffer without producing output
//!
//! Every failure collapses into one of four [`Reason`]s (`insufficient_memory`,
//! `data_not_compressed`, `corrupted_data`, `unknown`); a panic inside the
//! engine is caught and reported as `unknown`. No outcome carries a partially
//! written buffer.
//!
//! # Example
//!
//! ```no_run
//! use snappy_bridge::{compress, decompress, uncompressed_length, Outcome};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let compressed = match compress(data) {
//!     Outcome::Binary(bytes) => bytes,
//!     other => panic!("compression failed: {:?}", other),
//! };
//!
//! assert_eq!(uncompressed_length(&compressed), Outcome::Length(data.len()));
//! assert_eq!(decompress(&compressed), Outcome::Binary(data.to_vec()));
//! ```
//!
//! # Example - Boundary terms
//!
//! ```no_run
//! use snappy_bridge::{term, Bridge, Term};
//!
//! let bridge = Bridge::new();
//! let arg = Term::List(vec![Term::Binary(b"hello ".to_vec()), Term::Binary(b"world".to_vec())]);
//! let result = term::compress(&bridge, &arg).into_term()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod bridge;
pub mod common;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod sink;
pub mod term;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;

// Re-export commonly used types
pub use bridge::{Bridge, BridgeOptions};
pub use common::{
    max_compressed_len, Outcome, Reason, Result, SnappyError, BLOCK_SIZE, REASON_ATOMS,
};
pub use sink::{ByteArraySource, GrowableSink, GrowthPolicy, Sink, Source};
pub use term::{inspect_iolist, BadArgument, Term};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;

// Boundary operations with default options

/// Compress `input`; `Outcome::Binary` on success
pub fn compress(input: &[u8]) -> Outcome {
    Bridge::new().compress(input)
}

/// Decompress `input`; `Outcome::Binary` on success
pub fn decompress(input: &[u8]) -> Outcome {
    Bridge::new().decompress(input)
}

/// Declared uncompressed length of `input`; `Outcome::Length` on success
pub fn uncompressed_length(input: &[u8]) -> Outcome {
    Bridge::new().uncompressed_length(input)
}

/// Structural validity of `input`; `Outcome::Valid` on success
pub fn is_valid(input: &[u8]) -> Outcome {
    Bridge::new().is_valid(input)
}

// Convenience functions

/// Compress data in memory
///
/// # Arguments
/// * `data` - The data to compress
///
/// # Returns
/// A vector containing exactly the compressed bytes
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Bridge::new().try_compress(data)
}

/// Decompress data in memory
///
/// # Arguments
/// * `data` - The compressed data
///
/// # Returns
/// A vector containing the decompressed data
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Bridge::new().try_decompress(data)
}
