//! Snappy decompression engine
//!
//! This module provides the three read-side engine routines: reading the
//! declared uncompressed length from the preamble, decompressing into an
//! exactly pre-sized buffer, and validating a buffer without producing output.
//! All three share one decoder loop, parametrised over a [`DecompressionWriter`].

mod decoder;
mod header;
mod writer;

pub use header::parse_preamble;
pub use writer::{ArrayWriter, DecompressionWriter, Validator};

use crate::{Result, SnappyError};

/// Declared uncompressed length of `input`
///
/// Fails with [`SnappyError::MalformedHeader`] when the preamble is missing,
/// truncated, or longer than a 32-bit varint.
pub fn get_uncompressed_length(input: &[u8]) -> Result<usize> {
    parse_preamble(input)
        .map(|(len, _)| len)
        .ok_or(SnappyError::MalformedHeader)
}

/// Decompress `input`, appending exactly the declared number of bytes to `output`
///
/// The caller is expected to have reserved the declared length in `output`.
/// On failure `output` is restored to its previous length.
pub fn raw_uncompress(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let start = output.len();
    let mut writer = ArrayWriter::new(output);
    let result = decoder::decode(input, &mut writer);
    if result.is_err() {
        output.truncate(start);
    }
    result
}

/// Whether `input` is a complete, self-consistent compressed buffer
pub fn is_valid_compressed(input: &[u8]) -> bool {
    let mut validator = Validator::new();
    decoder::decode(input, &mut validator).is_ok()
}

/// Convenience function to decompress data in memory
pub fn decompress_bytes(input: &[u8]) -> Result<Vec<u8>> {
    let len = get_uncompressed_length(input)?;
    let mut output = Vec::new();
    output
        .try_reserve_exact(len)
        .map_err(|_| SnappyError::AllocationFailure { requested: len })?;
    raw_uncompress(input, &mut output)?;
    Ok(output)
}
