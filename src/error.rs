//! Error handling for bridge operations
//!
//! This module re-exports the error taxonomy used throughout the crate. Internal
//! errors are thiserror values; at the boundary each one collapses to a single
//! [`Reason`] or to a bad-argument signal.

pub use crate::common::Reason;
pub use crate::common::Result;
pub use crate::common::SnappyError;
