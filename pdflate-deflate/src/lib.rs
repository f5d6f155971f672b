//! # pdflate Deflate
//!
//! Zlib/DEFLATE compressor (RFC 1950, RFC 1951) for PDF stream data.
//!
//! ## Features
//!
//! - **LZ77**: hash-chain string matching with lazy evaluation
//! - **Huffman**: length-limited canonical codes built per block
//! - **Blocks**: each block is stored, static or dynamic, whichever is smallest
//! - **Zlib**: `78 9C` header and Adler-32 trailer
//! - **Filter**: `FlateDecode` stream filter that falls back to the original
//!   bytes when compression does not pay
//!
//! ## Example
//!
//! ```rust
//! use pdflate_deflate::{Deflated, DeflateEngine};
//!
//! let content = b"BT /F1 24 Tf 100 700 Td (Hello, World!) Tj ET\n".repeat(10);
//! match DeflateEngine::default().compress(&content).unwrap() {
//!     Deflated::Compressed(stream) => assert!(stream.data.len() < content.len()),
//!     Deflated::NotCompressible(reason) => panic!("not compressed: {:?}", reason),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod config;
pub mod deflate;
pub mod filter;
pub mod huffman;
pub mod lz77;
pub mod tables;
pub mod zlib;

// Re-exports
pub use block::{BlockKind, BlockOutcome, BlockStats};
pub use config::DeflateConfig;
pub use deflate::{CompressedStream, DeflateEngine, Deflated, NotCompressible};
pub use filter::{FLATE_DECODE, FlateFilter};
pub use huffman::{Alphabet, HuffmanTree};
pub use lz77::{Lz77Matcher, Token};
pub use zlib::zlib_compress;
