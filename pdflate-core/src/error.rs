//! Error types for pdflate operations.
//!
//! "Not compressible" is deliberately absent from this enum: it is a normal
//! outcome of compression and is reported through the compressor's result
//! type instead. The variants here are I/O failures, an exhausted output
//! budget, and internal consistency failures of the Huffman builder.

use std::io;
use thiserror::Error;

/// The main error type for pdflate operations.
#[derive(Debug, Error)]
pub enum PdflateError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The pre-sized output buffer has no room for the next write.
    #[error("Output buffer exhausted: need {needed} bytes, have {available}")]
    OutputBufferExhausted {
        /// Number of bytes the write required.
        needed: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// Canonical code assignment found bit-length counts that do not fill
    /// the code space exactly.
    #[error("Inconsistent code lengths: code space sums to {total:#x}, expected {expected:#x}")]
    InconsistentCodeLengths {
        /// Sum of the per-length code space.
        total: u32,
        /// Expected sum (2^16).
        expected: u32,
    },

    /// Length-limited tree construction could not flatten the tree further.
    #[error("Huffman tree cannot be limited to {max_bits} bits ({symbols} symbols)")]
    TreeBalance {
        /// Bit-length limit of the alphabet.
        max_bits: u8,
        /// Number of leaves in the tree.
        symbols: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for pdflate operations.
pub type Result<T> = std::result::Result<T, PdflateError>;

impl PdflateError {
    /// Create an output-buffer-exhausted error.
    pub fn buffer_exhausted(needed: usize, available: usize) -> Self {
        Self::OutputBufferExhausted { needed, available }
    }

    /// Create an inconsistent code lengths error.
    pub fn inconsistent_code_lengths(total: u32, expected: u32) -> Self {
        Self::InconsistentCodeLengths { total, expected }
    }

    /// Create a tree balance error.
    pub fn tree_balance(max_bits: u8, symbols: usize) -> Self {
        Self::TreeBalance { max_bits, symbols }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error only means the output budget ran out.
    pub fn is_buffer_exhausted(&self) -> bool {
        matches!(self, Self::OutputBufferExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PdflateError::buffer_exhausted(2, 1);
        assert!(err.to_string().contains("need 2 bytes, have 1"));

        let err = PdflateError::inconsistent_code_lengths(0x8000, 0x10000);
        assert!(err.to_string().contains("0x8000"));

        let err = PdflateError::tree_balance(7, 19);
        assert!(err.to_string().contains("7 bits"));
    }

    #[test]
    fn test_buffer_exhausted_predicate() {
        assert!(PdflateError::buffer_exhausted(4, 0).is_buffer_exhausted());
        assert!(!PdflateError::tree_balance(15, 2).is_buffer_exhausted());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: PdflateError = io_err.into();
        assert!(matches!(err, PdflateError::Io(_)));
    }
}
