//! Source and sink abstractions for the compression engine
//!
//! The engine pulls input from a [`Source`] and pushes output into a [`Sink`]
//! without knowing the final output size. [`GrowableSink`] is the sink used by
//! the bridge: it owns one allocation, grows on demand, and finalizes to an
//! exactly sized buffer.

mod growable;

pub use growable::{GrowableSink, GrowthPolicy};

use crate::Result;

/// Read-only view over input bytes handed to the engine
pub trait Source {
    /// Number of bytes remaining
    fn available(&self) -> usize;

    /// Contiguous bytes at the current position. May be shorter than
    /// [`Source::available`], and is empty only when nothing remains.
    fn peek(&self) -> &[u8];

    /// Advance the read position by `n` bytes
    fn skip(&mut self, n: usize);
}

/// Append-only destination for a push-style writer
///
/// A writer either fills an append slot in place and then commits it, or hands
/// over bytes it owns to be copied. Both paths exist because the writer decides
/// per call which one suits it.
pub trait Sink {
    /// Copy `data` to the end of the sink
    fn append(&mut self, data: &[u8]) -> Result<()>;

    /// Writable region of at least `min_len` bytes at the current end, without
    /// committing anything
    fn append_slot(&mut self, min_len: usize) -> Result<&mut [u8]>;

    /// Commit the first `n` bytes of the most recently returned append slot
    fn commit(&mut self, n: usize) -> Result<()>;
}

/// [`Source`] over a single flat byte slice
#[derive(Debug, Clone)]
pub struct ByteArraySource<'a> {
    data: &'a [u8],
}

impl<'a> ByteArraySource<'a> {
    /// Create a source over `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Source for ByteArraySource<'_> {
    fn available(&self) -> usize {
        self.data.len()
    }

    fn peek(&self) -> &[u8] {
        self.data
    }

    fn skip(&mut self, n: usize) {
        let n = n.min(self.data.len());
        self.data = &self.data[n..];
    }
}
