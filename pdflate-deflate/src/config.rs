//! Compressor configuration.
//!
//! Match parameters (chain depth, nice and good lengths) are fixed
//! constants of the lazy matcher; only the outer limits are configurable.

use pdflate_core::error::{PdflateError, Result};

/// Largest number of tokens buffered per block.
pub const MAX_BLOCK_CAPACITY: usize = 16384;

/// Inputs shorter than this are never compressed.
pub const DEFAULT_MIN_INPUT_LEN: usize = 16;

/// DEFLATE compressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateConfig {
    /// Inputs shorter than this are reported as not compressible.
    pub min_input_len: usize,
    /// Tokens collected before a block is sized and written (1-16384).
    pub block_capacity: usize,
}

impl DeflateConfig {
    /// Settings used for PDF streams.
    ///
    /// - 16-byte minimum input
    /// - 16384-token blocks
    pub const DEFAULT: Self = Self {
        min_input_len: DEFAULT_MIN_INPUT_LEN,
        block_capacity: MAX_BLOCK_CAPACITY,
    };

    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the minimum input length.
    pub fn with_min_input_len(mut self, min_input_len: usize) -> Self {
        self.min_input_len = min_input_len;
        self
    }

    /// Set the number of tokens per block.
    pub fn with_block_capacity(mut self, block_capacity: usize) -> Self {
        self.block_capacity = block_capacity;
        self
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.block_capacity == 0 || self.block_capacity > MAX_BLOCK_CAPACITY {
            return Err(PdflateError::invalid_config(format!(
                "block capacity {} not in 1..={}",
                self.block_capacity, MAX_BLOCK_CAPACITY
            )));
        }
        Ok(())
    }
}

impl Default for DeflateConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
