//! The `FlateDecode` stream filter.
//!
//! A PDF writer asks the filter for the bytes of a stream. When compression
//! pays, it gets the zlib stream and writes `/Filter /FlateDecode` in the
//! stream dictionary; otherwise it gets its own bytes back and writes no
//! filter.

use crate::config::DeflateConfig;
use crate::deflate::{DeflateEngine, Deflated};
use log::debug;
use pdflate_core::error::Result;
use pdflate_core::traits::{FilteredData, StreamFilter};

/// Filter name as written in a PDF stream dictionary.
pub const FLATE_DECODE: &str = "FlateDecode";

/// Zlib compression as a PDF stream filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateFilter {
    engine: DeflateEngine,
}

impl FlateFilter {
    /// Create a filter with a custom configuration.
    pub fn new(config: DeflateConfig) -> Result<Self> {
        Ok(Self {
            engine: DeflateEngine::new(config)?,
        })
    }
}

impl StreamFilter for FlateFilter {
    fn name(&self) -> &'static str {
        FLATE_DECODE
    }

    fn filter<'a>(&self, data: &'a [u8]) -> Result<FilteredData<'a>> {
        match self.engine.compress(data)? {
            Deflated::Compressed(stream) => Ok(FilteredData::encoded(stream.data, FLATE_DECODE)),
            Deflated::NotCompressible(reason) => {
                debug!("Writing {} bytes unfiltered: {:?}", data.len(), reason);
                Ok(FilteredData::unchanged(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::borrow::Cow;
    use std::io::{Cursor, Read};

    #[test]
    fn test_compressible_stream_is_tagged() {
        let content = b"q 1 0 0 1 0 0 cm BT /F1 10 Tf (Page) Tj ET Q\n".repeat(30);
        let filtered = FlateFilter::default().filter(&content).unwrap();

        assert_eq!(filtered.filter, Some("FlateDecode"));
        assert!(filtered.len() < content.len());

        let mut plain = Vec::new();
        ZlibDecoder::new(&filtered.data[..]).read_to_end(&mut plain).unwrap();
        assert_eq!(plain, content);
    }

    #[test]
    fn test_small_stream_passes_through() {
        let filtered = FlateFilter::default().filter(b"0 g").unwrap();
        assert!(!filtered.is_encoded());
        assert!(matches!(filtered.data, Cow::Borrowed(_)));
        assert_eq!(&*filtered.data, b"0 g");
    }

    #[test]
    fn test_filter_stream() {
        let content = b"1 0 0 RG 10 10 m 200 200 l S\n".repeat(40);
        let mut out = Vec::new();
        let summary = FlateFilter::default()
            .filter_stream(&mut Cursor::new(&content), &mut out)
            .unwrap();

        assert_eq!(summary.input_len, content.len() as u64);
        assert_eq!(summary.output_len, out.len() as u64);
        assert_eq!(summary.filter, Some(FLATE_DECODE));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DeflateConfig::new().with_block_capacity(0);
        assert!(FlateFilter::new(config).is_err());
    }
}
