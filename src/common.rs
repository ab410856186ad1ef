//! Common types and constants for the Snappy bridge
//!
//! This module defines the error taxonomy, the closed set of failure reasons that
//! may cross the call boundary, the outcome type returned by every boundary
//! operation, and the constants of the Snappy raw block format.

use thiserror::Error;

/// Error type for bridge and engine operations
#[derive(Debug, Error)]
pub enum SnappyError {
    /// An allocation (sink growth or exact output buffer) was refused
    #[error("Insufficient memory: could not allocate {requested} bytes")]
    AllocationFailure {
        /// Number of bytes that were requested
        requested: usize,
    },

    /// The uncompressed-length preamble is missing or invalid
    #[error("Data not compressed: missing or invalid length preamble")]
    MalformedHeader,

    /// The preamble parsed but the element stream is inconsistent
    #[error("Corrupted data: {0}")]
    CorruptedPayload(String),

    /// Input longer than the preamble can describe
    #[error("Input too large: {0} bytes (the length preamble holds at most 4 GiB - 1)")]
    InputTooLarge(usize),

    /// Unexpected fault inside the engine
    #[error("Internal fault: {0}")]
    Internal(String),
}

impl SnappyError {
    /// The boundary reason this error is reported as
    pub fn reason(&self) -> Reason {
        match self {
            SnappyError::AllocationFailure { .. } => Reason::InsufficientMemory,
            SnappyError::MalformedHeader => Reason::DataNotCompressed,
            SnappyError::CorruptedPayload(_) => Reason::CorruptedData,
            SnappyError::InputTooLarge(_) | SnappyError::Internal(_) => Reason::Unknown,
        }
    }

    pub(crate) fn corrupted(detail: &str) -> Self {
        SnappyError::CorruptedPayload(detail.to_string())
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, SnappyError>;

/// Closed set of failure reasons that may be handed across the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// Resource exhaustion at any allocation step
    InsufficientMemory = 0,
    /// Length preamble cannot be determined
    DataNotCompressed = 1,
    /// Preamble parses but the payload is inconsistent
    CorruptedData = 2,
    /// Any other internal fault
    Unknown = 3,
}

/// Canonical reason identifiers, indexed by `Reason as usize`
pub const REASON_ATOMS: [&str; 4] = [
    "insufficient_memory",
    "data_not_compressed",
    "corrupted_data",
    "unknown",
];

impl Reason {
    /// All reasons, in table order
    pub const ALL: [Reason; 4] = [
        Reason::InsufficientMemory,
        Reason::DataNotCompressed,
        Reason::CorruptedData,
        Reason::Unknown,
    ];

    /// Canonical identifier of this reason
    pub const fn atom(self) -> &'static str {
        REASON_ATOMS[self as usize]
    }

    /// Look a reason up by its canonical identifier
    pub fn from_atom(atom: &str) -> Option<Self> {
        REASON_ATOMS
            .iter()
            .position(|candidate| *candidate == atom)
            .map(|index| Reason::ALL[index])
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.atom())
    }
}

/// Result of a single boundary operation
///
/// No variant ever carries a partially written buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Compressed or decompressed bytes, sized exactly
    Binary(Vec<u8>),
    /// Declared uncompressed length
    Length(usize),
    /// Structural validity; `false` is a successful answer
    Valid(bool),
    /// One of the closed failure reasons
    Error(Reason),
    /// The argument was not a byte sequence; the engine was never entered
    BadArgument,
}

impl Outcome {
    /// Whether this outcome is one of the success shapes
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Binary(_) | Outcome::Length(_) | Outcome::Valid(_)
        )
    }

    /// The failure reason, if this is a failure
    pub fn reason(&self) -> Option<Reason> {
        match self {
            Outcome::Error(reason) => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn from_error(error: &SnappyError) -> Self {
        Outcome::Error(error.reason())
    }
}

// Snappy raw block format constants

/// Element tag: literal run
pub const TAG_LITERAL: u8 = 0x00;

/// Element tag: copy with 1-byte offset
pub const TAG_COPY_1: u8 = 0x01;

/// Element tag: copy with 2-byte offset
pub const TAG_COPY_2: u8 = 0x02;

/// Element tag: copy with 4-byte offset
pub const TAG_COPY_4: u8 = 0x03;

/// Input is compressed in independent fragments of this many bytes
pub const BLOCK_SIZE: usize = 1 << 16;

/// Largest input whose length fits in the preamble
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// Maximum encoded size of the length preamble
pub const MAX_VARINT_LEN: usize = 5;

/// Default sink growth multiplier applied to the requested append length
pub const DEFAULT_GROWTH_FACTOR: usize = 4;

/// Default minimum number of bytes added by one sink growth
pub const DEFAULT_MIN_GROWTH: usize = 8192;

/// Worst-case compressed size of `source_len` input bytes
pub const fn max_compressed_len(source_len: usize) -> usize {
    32 + source_len + source_len / 6
}
