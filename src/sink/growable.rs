//! GrowableSink - owned, amortized-growth output buffer
//!
//! The sink accepts writes of unpredictable size, grows its single allocation
//! by a multiple of the requested append length, and finalizes to a buffer whose
//! capacity equals its length.

use super::Sink;
use crate::common::{DEFAULT_GROWTH_FACTOR, DEFAULT_MIN_GROWTH};
use crate::{Result, SnappyError};
use log::trace;

/// Rule for how many bytes one sink growth adds
///
/// A growth adds `max(append_len * factor, min_growth)` bytes beyond the
/// current capacity. The step tracks the append size, not the buffer size, so
/// appends of roughly constant size `c` cost about
/// `total / max(c * factor, min_growth)` growths: linear in the total, but far
/// fewer than one per append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    factor: usize,
    min_growth: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            factor: DEFAULT_GROWTH_FACTOR,
            min_growth: DEFAULT_MIN_GROWTH,
        }
    }
}

impl GrowthPolicy {
    /// Create the default policy (4x the append length, at least 8192 bytes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the multiplier applied to the requested append length (minimum 1)
    pub fn with_factor(mut self, factor: usize) -> Self {
        self.factor = factor.max(1);
        self
    }

    /// Set the minimum number of bytes added by one growth
    pub fn with_min_growth(mut self, min_growth: usize) -> Self {
        self.min_growth = min_growth;
        self
    }

    /// Growth multiplier
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Minimum growth in bytes
    pub fn min_growth(&self) -> usize {
        self.min_growth
    }

    /// Bytes to add for an append of `append_len`, or `None` on overflow
    pub fn growth_for(&self, append_len: usize) -> Option<usize> {
        append_len
            .checked_mul(self.factor)
            .map(|growth| growth.max(self.min_growth))
    }
}

/// Output sink owning exactly one contiguous allocation
///
/// Invariant: `capacity() >= len()`. The sink is created per compress call and
/// never shared.
#[derive(Debug, Default)]
pub struct GrowableSink {
    // buf.len() is the capacity; bytes past `length` are scratch space.
    buf: Vec<u8>,
    length: usize,
    policy: GrowthPolicy,
    open_slot: usize,
    reallocations: usize,
}

impl GrowableSink {
    /// Create an empty sink with the default growth policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sink with a custom growth policy
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Bytes committed so far
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes allocated
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of times the allocation has grown
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Committed bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.length]
    }

    /// Make room for `append_len` more bytes, growing per the policy if needed
    pub fn ensure_capacity(&mut self, append_len: usize) -> Result<()> {
        let required = self
            .length
            .checked_add(append_len)
            .ok_or(SnappyError::AllocationFailure {
                requested: usize::MAX,
            })?;
        if required <= self.buf.len() {
            return Ok(());
        }

        let growth = self
            .policy
            .growth_for(append_len)
            .ok_or(SnappyError::AllocationFailure {
                requested: usize::MAX,
            })?;
        let new_capacity =
            self.buf
                .len()
                .checked_add(growth)
                .ok_or(SnappyError::AllocationFailure {
                    requested: usize::MAX,
                })?;

        self.buf
            .try_reserve_exact(growth)
            .map_err(|_| SnappyError::AllocationFailure {
                requested: new_capacity,
            })?;
        self.buf.resize(new_capacity, 0);
        self.reallocations += 1;

        trace!(
            "sink grew by {} bytes to {} (append of {}, growth #{})",
            growth,
            new_capacity,
            append_len,
            self.reallocations
        );
        Ok(())
    }

    /// Give up ownership of the committed bytes, trimmed to exactly `len()`
    pub fn finalize(mut self) -> Box<[u8]> {
        self.buf.truncate(self.length);
        self.buf.into_boxed_slice()
    }
}

impl Sink for GrowableSink {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_capacity(data.len())?;
        self.buf[self.length..self.length + data.len()].copy_from_slice(data);
        self.length += data.len();
        self.open_slot = 0;
        Ok(())
    }

    fn append_slot(&mut self, min_len: usize) -> Result<&mut [u8]> {
        self.ensure_capacity(min_len)?;
        self.open_slot = self.buf.len() - self.length;
        Ok(&mut self.buf[self.length..])
    }

    fn commit(&mut self, n: usize) -> Result<()> {
        if n > self.open_slot {
            return Err(SnappyError::Internal(format!(
                "commit of {} bytes exceeds open append slot of {}",
                n, self.open_slot
            )));
        }
        self.length += n;
        self.open_slot = 0;
        Ok(())
    }
}
