//! Snappy compression engine
//!
//! This module implements `Compress(source, sink)` for the Snappy raw block
//! format: a varint length preamble followed by literal and copy elements. Input
//! is processed in independent 64 KiB fragments, and each fragment is written
//! in place into an append slot requested from the sink.

mod emit;
mod fragment;

pub use fragment::HashTable;

use crate::common::{max_compressed_len, BLOCK_SIZE, MAX_INPUT_LEN, MAX_VARINT_LEN};
use crate::sink::{ByteArraySource, GrowableSink, Sink, Source};
use crate::{Result, SnappyError};

/// Fragments shorter than this are emitted as a single literal
pub const INPUT_MARGIN: usize = 15;

/// Smallest hash table used for a fragment
pub const MIN_HASH_TABLE_SIZE: usize = 1 << 8;

/// Largest hash table used for a fragment
pub const MAX_HASH_TABLE_SIZE: usize = 1 << 14;

/// Multiplier of the 4-byte hash
pub const HASH_MULTIPLIER: u32 = 0x1e35a7bd;

/// Compress everything `source` has into `sink`
///
/// Returns the number of bytes pushed into the sink.
pub fn compress<S, K>(source: &mut S, sink: &mut K) -> Result<usize>
where
    S: Source + ?Sized,
    K: Sink + ?Sized,
{
    let total = source.available();
    if total > MAX_INPUT_LEN {
        return Err(SnappyError::InputTooLarge(total));
    }

    let mut preamble = [0u8; MAX_VARINT_LEN];
    let preamble_len = encode_varint32(total as u32, &mut preamble);
    sink.append(&preamble[..preamble_len])?;
    let mut written = preamble_len;

    let mut table = HashTable::new();
    let mut scratch: Vec<u8> = Vec::new();
    let mut remaining = total;

    while remaining > 0 {
        let fragment_len = remaining.min(BLOCK_SIZE);

        // Gather the fragment into scratch if the source cannot hand it over
        // contiguously.
        let direct = source.peek().len() >= fragment_len;
        if !direct {
            scratch.clear();
            scratch
                .try_reserve_exact(fragment_len)
                .map_err(|_| SnappyError::AllocationFailure {
                    requested: fragment_len,
                })?;
            while scratch.len() < fragment_len {
                let chunk = source.peek();
                if chunk.is_empty() {
                    return Err(SnappyError::Internal(format!(
                        "source ended {} bytes early",
                        fragment_len - scratch.len()
                    )));
                }
                let take = chunk.len().min(fragment_len - scratch.len());
                scratch.extend_from_slice(&chunk[..take]);
                source.skip(take);
            }
        }

        let block = if direct {
            &source.peek()[..fragment_len]
        } else {
            &scratch[..]
        };

        let max_output = max_compressed_len(fragment_len);
        let slot = sink.append_slot(max_output)?;
        let produced = fragment::compress_fragment(block, &mut slot[..max_output], &mut table);
        sink.commit(produced)?;

        written += produced;
        remaining -= fragment_len;
        if direct {
            source.skip(fragment_len);
        }
    }

    Ok(written)
}

/// Convenience function to compress data in memory
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut source = ByteArraySource::new(data);
    let mut sink = GrowableSink::new();
    compress(&mut source, &mut sink)?;
    Ok(Vec::from(sink.finalize()))
}

/// Encode `value` as a little-endian base-128 varint, returning its length
pub fn encode_varint32(mut value: u32, out: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        out[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    out[i] = value as u8;
    i + 1
}
