//! Bridge - the four boundary operations
//!
//! Each operation is a single synchronous transform over one flat byte range.
//! Failures of any kind are folded into one [`Outcome`]: engine errors map to
//! their [`Reason`], and a panic inside the engine is caught here and reported
//! as [`Reason::Unknown`]. Buffers are handed out only on success; anything
//! allocated by a failing call is dropped before the outcome is returned.

use crate::common::{Outcome, Reason};
use crate::sink::{ByteArraySource, GrowableSink, GrowthPolicy};
use crate::{compress, decompress, Result, SnappyError};
use log::{debug, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Configuration for a [`Bridge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeOptions {
    growth: GrowthPolicy,
    max_uncompressed_len: Option<usize>,
}

impl BridgeOptions {
    /// Default options: default growth policy, no decompressed size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth policy of the compress-path sink
    pub fn with_growth_policy(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Refuse to allocate decompression output larger than `limit` bytes
    pub fn with_max_uncompressed_len(mut self, limit: usize) -> Self {
        self.max_uncompressed_len = Some(limit);
        self
    }

    /// Growth policy of the compress-path sink
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Decompression output limit, if any
    pub fn max_uncompressed_len(&self) -> Option<usize> {
        self.max_uncompressed_len
    }
}

/// Stateless facade over the compression engine
///
/// A `Bridge` holds only its options; every call allocates and owns its own
/// buffers, so one bridge may be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    options: BridgeOptions,
}

impl Bridge {
    /// Create a bridge with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bridge with custom options
    pub fn with_options(options: BridgeOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Compress `input` into an exactly sized buffer
    pub fn try_compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut source = ByteArraySource::new(input);
        let mut sink = GrowableSink::with_policy(self.options.growth);
        compress::compress(&mut source, &mut sink)?;

        let growths = sink.reallocations();
        let output = Vec::from(sink.finalize());
        debug!(
            "compressed {} bytes into {} ({} sink growths)",
            input.len(),
            output.len(),
            growths
        );
        Ok(output)
    }

    /// Decompress `input` into a buffer allocated once at the declared length
    pub fn try_decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let len = decompress::get_uncompressed_length(input)?;
        if let Some(limit) = self.options.max_uncompressed_len {
            if len > limit {
                return Err(SnappyError::AllocationFailure { requested: len });
            }
        }

        let mut output = Vec::new();
        output
            .try_reserve_exact(len)
            .map_err(|_| SnappyError::AllocationFailure { requested: len })?;
        decompress::raw_uncompress(input, &mut output)?;

        debug!("decompressed {} bytes into {}", input.len(), output.len());
        Ok(output)
    }

    /// Declared uncompressed length of `input`
    pub fn try_uncompressed_length(&self, input: &[u8]) -> Result<usize> {
        decompress::get_uncompressed_length(input)
    }

    /// Whether `input` is a valid compressed buffer
    pub fn try_is_valid(&self, input: &[u8]) -> Result<bool> {
        Ok(decompress::is_valid_compressed(input))
    }

    /// Compress; `Binary` on success
    pub fn compress(&self, input: &[u8]) -> Outcome {
        guard("compress", || self.try_compress(input).map(Outcome::Binary))
    }

    /// Decompress; `Binary` on success
    pub fn decompress(&self, input: &[u8]) -> Outcome {
        guard("decompress", || {
            self.try_decompress(input).map(Outcome::Binary)
        })
    }

    /// Read the declared length; `Length` on success
    pub fn uncompressed_length(&self, input: &[u8]) -> Outcome {
        guard("uncompressed_length", || {
            self.try_uncompressed_length(input).map(Outcome::Length)
        })
    }

    /// Validate; `Valid(true)` or `Valid(false)` on success
    pub fn is_valid(&self, input: &[u8]) -> Outcome {
        guard("is_valid", || self.try_is_valid(input).map(Outcome::Valid))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run one operation, folding errors and panics into an [`Outcome`]
fn guard<F>(operation: &str, f: F) -> Outcome
where
    F: FnOnce() -> Result<Outcome>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(error)) => {
            debug!("{} failed: {}", operation, error);
            Outcome::from_error(&error)
        }
        Err(payload) => {
            warn!(
                "{} faulted: {}",
                operation,
                panic_message(payload.as_ref())
            );
            Outcome::Error(Reason::Unknown)
        }
    }
}
