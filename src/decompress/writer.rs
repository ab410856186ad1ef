//! Output targets for the decoder loop
//!
//! [`ArrayWriter`] materialises the output into a buffer reserved up front.
//! [`Validator`] performs the same bounds checks but writes nothing, so
//! validity can be decided without allocating the output.

use crate::{Result, SnappyError};

/// Destination the decoder loop drives
pub trait DecompressionWriter {
    /// Record the length declared by the preamble
    fn set_expected_length(&mut self, len: usize);

    /// Append literal bytes
    fn append(&mut self, literal: &[u8]) -> Result<()>;

    /// Append `len` bytes copied from `offset` bytes back in the output
    fn append_from_self(&mut self, offset: usize, len: usize) -> Result<()>;

    /// Whether exactly the declared length has been produced
    fn check_length(&self) -> bool;
}

fn check_room(produced: usize, len: usize, expected: usize) -> Result<()> {
    match produced.checked_add(len) {
        Some(end) if end <= expected => Ok(()),
        _ => Err(SnappyError::corrupted("element runs past declared length")),
    }
}

fn check_offset(offset: usize, produced: usize) -> Result<()> {
    if offset == 0 || offset > produced {
        return Err(SnappyError::CorruptedPayload(format!(
            "copy offset {} outside {} bytes of output",
            offset, produced
        )));
    }
    Ok(())
}

/// Writer appending to a caller-provided buffer, never past the declared length
#[derive(Debug)]
pub struct ArrayWriter<'a> {
    out: &'a mut Vec<u8>,
    start: usize,
    expected: usize,
}

impl<'a> ArrayWriter<'a> {
    /// Create a writer appending after the current contents of `out`
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        let start = out.len();
        Self {
            out,
            start,
            expected: 0,
        }
    }

    fn produced(&self) -> usize {
        self.out.len() - self.start
    }
}

impl DecompressionWriter for ArrayWriter<'_> {
    fn set_expected_length(&mut self, len: usize) {
        self.expected = len;
    }

    fn append(&mut self, literal: &[u8]) -> Result<()> {
        check_room(self.produced(), literal.len(), self.expected)?;
        self.out.extend_from_slice(literal);
        Ok(())
    }

    fn append_from_self(&mut self, offset: usize, len: usize) -> Result<()> {
        check_offset(offset, self.produced())?;
        check_room(self.produced(), len, self.expected)?;

        // Overlapping copies repeat the last `offset` bytes; copy in pieces of
        // at most `offset` so each piece reads only bytes already written.
        let mut remaining = len;
        while remaining > 0 {
            let from = self.out.len() - offset;
            let piece = remaining.min(offset);
            self.out.extend_from_within(from..from + piece);
            remaining -= piece;
        }
        Ok(())
    }

    fn check_length(&self) -> bool {
        self.produced() == self.expected
    }
}

/// Writer that only tracks how much output would be produced
#[derive(Debug, Default)]
pub struct Validator {
    expected: usize,
    produced: usize,
}

impl Validator {
    /// Create a validator
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecompressionWriter for Validator {
    fn set_expected_length(&mut self, len: usize) {
        self.expected = len;
    }

    fn append(&mut self, literal: &[u8]) -> Result<()> {
        check_room(self.produced, literal.len(), self.expected)?;
        self.produced += literal.len();
        Ok(())
    }

    fn append_from_self(&mut self, offset: usize, len: usize) -> Result<()> {
        check_offset(offset, self.produced)?;
        check_room(self.produced, len, self.expected)?;
        self.produced += len;
        Ok(())
    }

    fn check_length(&self) -> bool {
        self.produced == self.expected
    }
}
