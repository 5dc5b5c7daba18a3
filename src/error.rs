//! Error types for sigma-huffman

use std::collections::TryReserveError;
use thiserror::Error;

pub type Result<T, E = CompressError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("empty input: frequency table has no symbols")]
    EmptyInput,

    #[error("byte {0:#04x} has no entry in the code table")]
    MissingCode(u8),

    #[error("compressed stream truncated: decoded {decoded} of {expected} symbols")]
    TruncatedStream { expected: u64, decoded: u64 },

    #[error("malformed frequency table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("symbol {0} appears more than once in the frequency table")]
    DuplicateSymbol(u8),

    #[error("symbol {0} has a zero count")]
    ZeroCount(u8),

    #[error("symbol counts overflow a 64-bit total")]
    CountOverflow,

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("allocation failed: {0}")]
    AllocationError(#[from] TryReserveError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification of a [`CompressError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Allocation,
    Structural,
    Config,
}

impl CompressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressError::IoError(_) => ErrorKind::Io,
            CompressError::AllocationError(_) | CompressError::InputTooLarge { .. } => {
                ErrorKind::Allocation
            }
            CompressError::ConfigError(_) => ErrorKind::Config,
            CompressError::EmptyInput
            | CompressError::MissingCode(_)
            | CompressError::TruncatedStream { .. }
            | CompressError::MalformedTable { .. }
            | CompressError::DuplicateSymbol(_)
            | CompressError::ZeroCount(_)
            | CompressError::CountOverflow => ErrorKind::Structural,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CompressError::MalformedTable {
            line,
            reason: reason.into(),
        }
    }
}
