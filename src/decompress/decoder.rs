//! Element decoder loop
//!
//! Walks the element stream after the preamble, decoding literal and copy
//! tags and driving a [`DecompressionWriter`]. Every read from the input is
//! bounds-checked, so truncated or hostile input ends in an error rather than
//! an out-of-range access.

use super::header::parse_preamble;
use super::writer::DecompressionWriter;
use crate::common::{TAG_COPY_1, TAG_COPY_2, TAG_LITERAL};
use crate::{Result, SnappyError};

/// Read `n` little-endian bytes at `pos`
fn read_le(input: &[u8], pos: usize, n: usize) -> Result<usize> {
    let bytes = pos
        .checked_add(n)
        .and_then(|end| input.get(pos..end))
        .ok_or_else(|| SnappyError::corrupted("element truncated"))?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, &byte| (acc << 8) | byte as usize))
}

/// Decode all of `input` into `writer`
pub(crate) fn decode<W: DecompressionWriter + ?Sized>(input: &[u8], writer: &mut W) -> Result<()> {
    let (expected, mut ip) = parse_preamble(input).ok_or(SnappyError::MalformedHeader)?;
    writer.set_expected_length(expected);

    while ip < input.len() {
        let tag = input[ip];
        ip += 1;

        match tag & 0x03 {
            TAG_LITERAL => {
                let mut len = (tag >> 2) as usize + 1;
                if len > 60 {
                    // 61..64 encode a length in the next 1..4 bytes
                    let extra = len - 60;
                    len = read_le(input, ip, extra)? + 1;
                    ip += extra;
                }
                let literal = ip
                    .checked_add(len)
                    .and_then(|end| input.get(ip..end))
                    .ok_or_else(|| SnappyError::corrupted("literal truncated"))?;
                writer.append(literal)?;
                ip += len;
            }
            TAG_COPY_1 => {
                let len = ((tag >> 2) & 0x07) as usize + 4;
                let offset = (((tag >> 5) as usize) << 8) | read_le(input, ip, 1)?;
                ip += 1;
                writer.append_from_self(offset, len)?;
            }
            TAG_COPY_2 => {
                let len = (tag >> 2) as usize + 1;
                let offset = read_le(input, ip, 2)?;
                ip += 2;
                writer.append_from_self(offset, len)?;
            }
            _ => {
                let len = (tag >> 2) as usize + 1;
                let offset = read_le(input, ip, 4)?;
                ip += 4;
                writer.append_from_self(offset, len)?;
            }
        }
    }

    if !writer.check_length() {
        return Err(SnappyError::corrupted(
            "output length differs from declared length",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::writer::{ArrayWriter, Validator};
    use super::*;

    fn decode_to_vec(input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        decode(input, &mut ArrayWriter::new(&mut out))?;
        Ok(out)
    }

    #[test]
    fn test_empty_stream() {
        assert!(decode_to_vec(&[0x00]).unwrap().is_empty());
        assert!(matches!(
            decode_to_vec(&[]),
            Err(SnappyError::MalformedHeader)
        ));
    }

    #[test]
    fn test_all_copy_tags() {
        // "abcd" then copy-1 (len 4, off 4), copy-2 (len 2, off 8), copy-4 (len 1, off 1)
        let input = [
            0x0b, // 11 bytes
            0x0c, b'a', b'b', b'c', b'd', // literal "abcd"
            0x01, 0x04, // copy-1
            0x06, 0x08, 0x00, // copy-2
            0x03, 0x01, 0x00, 0x00, 0x00, // copy-4
        ];
        assert_eq!(decode_to_vec(&input).unwrap(), b"abcdabcdabb");
        assert!(decode(&input, &mut Validator::new()).is_ok());
    }

    #[test]
    fn test_long_literal_length_bytes() {
        let mut input = vec![0x3d, 60 << 2, 60];
        input.extend(std::iter::repeat(b'q').take(61));
        let out = decode_to_vec(&input).unwrap();
        assert_eq!(out.len(), 61);
    }

    #[test]
    fn test_corruptions() {
        // Literal truncated
        assert!(matches!(
            decode_to_vec(&[0x05, 0x10, b'a']),
            Err(SnappyError::CorruptedPayload(_))
        ));
        // Literal length bytes truncated
        assert!(matches!(
            decode_to_vec(&[0x05, 62 << 2, 0x01]),
            Err(SnappyError::CorruptedPayload(_))
        ));
        // Copy before any output
        assert!(matches!(
            decode_to_vec(&[0x04, 0x01, 0x01]),
            Err(SnappyError::CorruptedPayload(_))
        ));
        // Copy offset byte missing
        assert!(matches!(
            decode_to_vec(&[0x05, 0x00, b'a', 0x01]),
            Err(SnappyError::CorruptedPayload(_))
        ));
        // Too much output
        assert!(matches!(
            decode_to_vec(&[0x01, 0x04, b'a', b'b']),
            Err(SnappyError::CorruptedPayload(_))
        ));
        // Too little output
        assert!(matches!(
            decode_to_vec(&[0x03, 0x00, b'a']),
            Err(SnappyError::CorruptedPayload(_))
        ));
    }

    #[test]
    fn test_huge_declared_literal_is_rejected() {
        // Four length bytes of 0xff: far beyond the input
        let input = [0x05, 63 << 2, 0xff, 0xff, 0xff, 0xff, b'a'];
        assert!(matches!(
            decode(&input, &mut Validator::new()),
            Err(SnappyError::CorruptedPayload(_))
        ));
    }
}
