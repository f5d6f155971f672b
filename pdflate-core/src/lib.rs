//! # pdflate Core
//!
//! Core components shared by the pdflate crates:
//!
//! - [`bitstream`]: LSB-first bit writer over a fixed output budget
//! - [`adler32`]: Adler-32 checksum for the zlib trailer
//! - [`traits`]: PDF stream filter interface
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```rust
//! use pdflate_core::Adler32;
//! use pdflate_core::bitstream::BitWriter;
//!
//! let mut out = [0u8; 8];
//! let mut writer = BitWriter::new(&mut out);
//! writer.write_bits(0b011, 3).unwrap();
//! assert_eq!(writer.finish().unwrap(), 1);
//!
//! assert_eq!(Adler32::checksum(b"abc"), 0x024D0127);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adler32;
pub mod bitstream;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use adler32::{ADLER32_INIT, Adler32, adler32_update};
pub use bitstream::BitWriter;
pub use error::{PdflateError, Result};
pub use traits::{FilteredData, FilteredSummary, StreamFilter};
