//! Element encoders for literal runs and back-references

use crate::common::{TAG_COPY_1, TAG_COPY_2, TAG_LITERAL};

/// Write a literal element for `literal` (non-empty) at `op`, returning the new end
pub(crate) fn emit_literal(out: &mut [u8], mut op: usize, literal: &[u8]) -> usize {
    let n = literal.len() - 1;
    if n < 60 {
        out[op] = TAG_LITERAL | ((n as u8) << 2);
        op += 1;
    } else {
        // Tags 60..63 announce 1..4 little-endian length bytes
        let tag_pos = op;
        op += 1;
        let mut remaining = n;
        let mut count = 0u8;
        while remaining > 0 {
            out[op] = (remaining & 0xff) as u8;
            remaining >>= 8;
            op += 1;
            count += 1;
        }
        out[tag_pos] = TAG_LITERAL | ((59 + count) << 2);
    }

    out[op..op + literal.len()].copy_from_slice(literal);
    op + literal.len()
}

/// Write one copy element of 4..=64 bytes
fn emit_copy_upto_64(out: &mut [u8], op: usize, offset: usize, len: usize) -> usize {
    debug_assert!((4..=64).contains(&len));
    debug_assert!(offset > 0 && offset < 1 << 16);

    if len < 12 && offset < 2048 {
        out[op] = TAG_COPY_1 | (((len - 4) as u8) << 2) | (((offset >> 8) as u8) << 5);
        out[op + 1] = (offset & 0xff) as u8;
        op + 2
    } else {
        out[op] = TAG_COPY_2 | (((len - 1) as u8) << 2);
        out[op + 1..op + 3].copy_from_slice(&(offset as u16).to_le_bytes());
        op + 3
    }
}

/// Write a back-reference of `len` (>= 4) bytes at distance `offset`
pub(crate) fn emit_copy(out: &mut [u8], mut op: usize, offset: usize, mut len: usize) -> usize {
    // Split so that no piece is shorter than 4 bytes
    while len >= 68 {
        op = emit_copy_upto_64(out, op, offset, 64);
        len -= 64;
    }
    if len > 64 {
        op = emit_copy_upto_64(out, op, offset, 60);
        len -= 60;
    }
    emit_copy_upto_64(out, op, offset, len)
}
