//! Command implementations for the pdflate CLI.

pub mod checksum;
pub mod compress;
pub mod info;

pub use checksum::cmd_checksum;
pub use compress::{CompressOptions, cmd_compress};
pub use info::cmd_info;

use clap::Args;
use pdflate_deflate::{DeflateConfig, DeflateEngine, config::MAX_BLOCK_CAPACITY};

/// Engine tuning shared by the commands that compress.
#[derive(Debug, Clone, Copy, Args)]
pub struct EngineArgs {
    /// Inputs shorter than this are not compressed
    #[arg(long, default_value_t = DeflateConfig::DEFAULT.min_input_len)]
    pub min_len: usize,

    /// Tokens per DEFLATE block
    #[arg(long, default_value_t = MAX_BLOCK_CAPACITY)]
    pub block_capacity: usize,
}

impl EngineArgs {
    /// Build an engine, rejecting out-of-range settings.
    pub fn engine(&self) -> pdflate_core::Result<DeflateEngine> {
        DeflateEngine::new(
            DeflateConfig::new()
                .with_min_input_len(self.min_len)
                .with_block_capacity(self.block_capacity),
        )
    }
}
