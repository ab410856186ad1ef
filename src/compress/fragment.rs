//! Single-fragment compressor and its hash table
//!
//! Matches are found by hashing 4-byte windows into a table of recent
//! positions. When no match turns up the scan accelerates, probing every
//! `skip >> 5` bytes, so incompressible input is passed through quickly as
//! literals.

use super::emit::{emit_copy, emit_literal};
use super::{HASH_MULTIPLIER, INPUT_MARGIN, MAX_HASH_TABLE_SIZE, MIN_HASH_TABLE_SIZE};

/// Position table reused across the fragments of one compress call
#[derive(Debug)]
pub struct HashTable {
    entries: Vec<u16>,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HashTable {
    /// Create a table large enough for any fragment
    pub fn new() -> Self {
        Self {
            entries: vec![0; MAX_HASH_TABLE_SIZE],
        }
    }

    /// Table size used for a fragment of `fragment_len` bytes
    pub fn size_for(fragment_len: usize) -> usize {
        let mut size = MIN_HASH_TABLE_SIZE;
        while size < MAX_HASH_TABLE_SIZE && size < fragment_len {
            size <<= 1;
        }
        size
    }

    /// Clear and size the table for a fragment, returning it with its hash shift
    fn prepare(&mut self, fragment_len: usize) -> (&mut [u16], u32) {
        let size = Self::size_for(fragment_len);
        let table = &mut self.entries[..size];
        table.fill(0);
        (table, 32 - size.trailing_zeros())
    }
}

#[inline]
fn load32(input: &[u8], pos: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&input[pos..pos + 4]);
    u32::from_le_bytes(bytes)
}

#[inline]
fn hash(value: u32, shift: u32) -> usize {
    (value.wrapping_mul(HASH_MULTIPLIER) >> shift) as usize
}

/// Number of equal bytes at `earlier` and `later`, bounded by the input end
#[inline]
fn match_length(input: &[u8], mut earlier: usize, mut later: usize) -> usize {
    let start = later;
    while later < input.len() && input[earlier] == input[later] {
        earlier += 1;
        later += 1;
    }
    later - start
}

/// Compress one fragment (at most 64 KiB) into `out`
///
/// `out` must hold at least `max_compressed_len(input.len())` bytes. Returns
/// the number of bytes written.
pub(crate) fn compress_fragment(input: &[u8], out: &mut [u8], table: &mut HashTable) -> usize {
    let len = input.len();
    let mut op = 0;
    let mut next_emit = 0;

    if len >= INPUT_MARGIN {
        let (table, shift) = table.prepare(len);
        let ip_limit = len - INPUT_MARGIN;
        let mut ip = 1;

        'fragment: loop {
            // Scan for a 4-byte match, probing further apart the longer
            // nothing is found.
            let mut skip = 32usize;
            let mut next_ip = ip;
            let mut candidate = loop {
                ip = next_ip;
                let h = hash(load32(input, ip), shift);
                next_ip = ip + (skip >> 5);
                skip += 1;
                if next_ip > ip_limit {
                    break 'fragment;
                }
                let candidate = table[h] as usize;
                table[h] = ip as u16;
                if load32(input, ip) == load32(input, candidate) {
                    break candidate;
                }
            };

            op = emit_literal(out, op, &input[next_emit..ip]);

            // Emit copies for as long as the byte right after a copy starts
            // another match.
            loop {
                let base = ip;
                let matched = 4 + match_length(input, candidate + 4, ip + 4);
                ip += matched;
                op = emit_copy(out, op, base - candidate, matched);
                next_emit = ip;
                if ip >= ip_limit {
                    break 'fragment;
                }

                let prev = ip - 1;
                table[hash(load32(input, prev), shift)] = prev as u16;

                let h = hash(load32(input, ip), shift);
                candidate = table[h] as usize;
                table[h] = ip as u16;
                if load32(input, ip) != load32(input, candidate) {
                    break;
                }
            }

            ip += 1;
        }
    }

    if next_emit < len {
        op = emit_literal(out, op, &input[next_emit..]);
    }
    op
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::max_compressed_len;

    fn compress_one(input: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; max_compressed_len(input.len())];
        let mut table = HashTable::new();
        let n = compress_fragment(input, &mut out, &mut table);
        out.truncate(n);
        out
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(HashTable::size_for(0), 256);
        assert_eq!(HashTable::size_for(256), 256);
        assert_eq!(HashTable::size_for(257), 512);
        assert_eq!(HashTable::size_for(10_000), 16384);
        assert_eq!(HashTable::size_for(65536), 16384);
    }

    #[test]
    fn test_match_length() {
        let input = b"abcdabcdabcX";
        assert_eq!(match_length(input, 0, 4), 7);
        assert_eq!(match_length(input, 0, 8), 3);
        assert_eq!(match_length(b"aaaa", 0, 1), 3);
    }

    #[test]
    fn test_short_fragment_is_literal() {
        let out = compress_one(b"abcdefghijklmn");
        assert_eq!(out[0], 13 << 2);
        assert_eq!(&out[1..], b"abcdefghijklmn");
    }

    #[test]
    fn test_repeated_bytes_use_copies() {
        let input = vec![b'a'; 100];
        let out = compress_one(&input);
        // One-byte literal, then copies at offset 1
        assert_eq!(&out[..2], &[0x00, b'a']);
        assert!(out.len() < 10, "got {} bytes", out.len());
        assert_eq!(out[2] & 0x03, crate::common::TAG_COPY_2);
    }

    #[test]
    fn test_incompressible_stays_within_bound() {
        let mut state = 0x1234_5678u32;
        let input: Vec<u8> = (0..65536)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        let out = compress_one(&input);
        assert!(out.len() <= max_compressed_len(input.len()));
        assert!(out.len() >= input.len());
    }
}
