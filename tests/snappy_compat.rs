//! Format compatibility tests
//!
//! Hand-assembled streams in the Snappy raw block format, checked against the
//! decoder, plus the exact encodings produced for small inputs.

use snappy_bridge::{compress_bytes, decompress, decompress_bytes, is_valid, Outcome, Reason};

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s.replace(' ', "")).unwrap()
}

#[test]
fn test_short_literal_encoding() {
    let compressed = compress_bytes(b"hello world").unwrap();
    assert_eq!(
        hex::encode(&compressed),
        format!("0b28{}", hex::encode(b"hello world"))
    );
}

#[test]
fn test_run_encoding() {
    // One literal 'a', then a 19-byte copy at offset 1
    let compressed = compress_bytes(&[b'a'; 20]).unwrap();
    assert_eq!(compressed, unhex("14 00 61 4a 01 00"));
}

#[test]
fn test_decode_copy_1() {
    // "abcd" + copy-1 len 8 offset 4
    let input = unhex("0c 0c 61626364 11 04");
    assert_eq!(decompress_bytes(&input).unwrap(), b"abcdabcdabcd");
}

#[test]
fn test_decode_copy_2() {
    // "xyz" + copy-2 len 30 offset 3
    let input = unhex("21 08 78797a 76 0300");
    let expected: Vec<u8> = b"xyz".iter().cycle().take(33).copied().collect();
    assert_eq!(decompress_bytes(&input).unwrap(), expected);
}

#[test]
fn test_decode_copy_4() {
    // "12" + copy-4 len 2 offset 2
    let input = unhex("04 04 3132 07 02000000");
    assert_eq!(decompress_bytes(&input).unwrap(), b"1212");
}

#[test]
fn test_decode_multi_byte_literal_lengths() {
    for (tag, len_bytes) in [(0xf0u8, 1usize), (0xf4, 2), (0xf8, 3), (0xfc, 4)] {
        let len = 70usize;
        let mut input = vec![len as u8, tag];
        let mut encoded = ((len - 1) as u32).to_le_bytes().to_vec();
        encoded.truncate(len_bytes);
        input.extend_from_slice(&encoded);
        input.extend(std::iter::repeat(b'k').take(len));

        assert_eq!(decompress_bytes(&input).unwrap(), vec![b'k'; len]);
    }
}

#[test]
fn test_offset_zero_is_corrupt() {
    let input = unhex("08 00 61 0d 00");
    assert_eq!(decompress(&input), Outcome::Error(Reason::CorruptedData));
    assert_eq!(is_valid(&input), Outcome::Valid(false));
}

#[test]
fn test_offset_before_start_is_corrupt() {
    let input = unhex("08 04 6162 12 00 03");
    assert_eq!(decompress(&input), Outcome::Error(Reason::CorruptedData));
}

#[test]
fn test_oversized_preamble() {
    // Fifth preamble byte carries bits beyond 32
    let input = unhex("ffffffff1f 00");
    assert_eq!(decompress(&input), Outcome::Error(Reason::DataNotCompressed));
}

#[test]
fn test_trailing_bytes_after_complete_output() {
    // Declares 1 byte, then a literal of 1 byte, then another literal
    let input = unhex("01 00 61 00 62");
    assert_eq!(decompress(&input), Outcome::Error(Reason::CorruptedData));
}
