//! Length preamble parsing

use crate::common::MAX_VARINT_LEN;

/// Parse the varint32 length preamble at the start of `input`
///
/// Returns the declared uncompressed length and the number of preamble bytes,
/// or `None` if the preamble is truncated or does not fit in 32 bits.
pub fn parse_preamble(input: &[u8]) -> Option<(usize, usize)> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = *input.get(i)?;
        if i == MAX_VARINT_LEN - 1 {
            // Only the low four bits of the fifth byte are left in a u32
            if byte >= 0x10 {
                return None;
            }
            value |= (byte as u32) << 28;
            return Some((value as usize, MAX_VARINT_LEN));
        }

        value |= ((byte & 0x7f) as u32) << (7 * i);
        if byte < 0x80 {
            return Some((value as usize, i + 1));
        }
    }
    None
}
