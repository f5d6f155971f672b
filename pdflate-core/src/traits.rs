//! Stream filter traits.
//!
//! A PDF stream filter turns the raw bytes of a content or image stream into
//! the bytes that are written between `stream` and `endstream`. A filter may
//! decline to encode (for example when compression would not shrink the
//! data); the caller then writes the original bytes and leaves the filter
//! out of the stream dictionary.

use crate::error::Result;
use std::borrow::Cow;
use std::io::{Read, Write};

/// Result of running a filter over a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredData<'a> {
    /// Bytes to write into the stream body.
    pub data: Cow<'a, [u8]>,
    /// Filter name to put in the `/Filter` entry, `None` when the data is
    /// unchanged.
    pub filter: Option<&'static str>,
}

impl<'a> FilteredData<'a> {
    /// Data that the filter encoded.
    pub fn encoded(data: Vec<u8>, filter: &'static str) -> Self {
        Self {
            data: Cow::Owned(data),
            filter: Some(filter),
        }
    }

    /// Data the filter passed through untouched.
    pub fn unchanged(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            filter: None,
        }
    }

    /// Whether the filter was applied.
    pub fn is_encoded(&self) -> bool {
        self.filter.is_some()
    }

    /// Number of bytes to write.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Summary of a [`StreamFilter::filter_stream`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteredSummary {
    /// Bytes read from the source.
    pub input_len: u64,
    /// Bytes written to the destination.
    pub output_len: u64,
    /// Filter applied, if any.
    pub filter: Option<&'static str>,
}

/// An encoding filter for PDF stream data.
pub trait StreamFilter {
    /// Name of the filter as it appears in a PDF `/Filter` entry.
    fn name(&self) -> &'static str;

    /// Filter an in-memory buffer.
    fn filter<'a>(&self, data: &'a [u8]) -> Result<FilteredData<'a>>;

    /// Read all of `read`, filter it, and write the result to `write`.
    fn filter_stream(&self, read: &mut dyn Read, write: &mut dyn Write) -> Result<FilteredSummary> {
        let mut input = Vec::new();
        read.read_to_end(&mut input)?;

        let filtered = self.filter(&input)?;
        write.write_all(&filtered.data)?;

        Ok(FilteredSummary {
            input_len: input.len() as u64,
            output_len: filtered.len() as u64,
            filter: filtered.filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Passes data through unless it starts with a marker byte.
    struct MarkerFilter;

    impl StreamFilter for MarkerFilter {
        fn name(&self) -> &'static str {
            "Marker"
        }

        fn filter<'a>(&self, data: &'a [u8]) -> Result<FilteredData<'a>> {
            if data.first() == Some(&b'!') {
                Ok(FilteredData::encoded(data[1..].to_vec(), self.name()))
            } else {
                Ok(FilteredData::unchanged(data))
            }
        }
    }

    #[test]
    fn test_unchanged_borrows() {
        let input = b"plain";
        let filtered = MarkerFilter.filter(input).unwrap();
        assert!(!filtered.is_encoded());
        assert!(matches!(filtered.data, Cow::Borrowed(_)));
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn test_filter_stream_reports_lengths() {
        let mut read = Cursor::new(b"!abc".to_vec());
        let mut write = Vec::new();
        let summary = MarkerFilter.filter_stream(&mut read, &mut write).unwrap();

        assert_eq!(write, b"abc");
        assert_eq!(
            summary,
            FilteredSummary {
                input_len: 4,
                output_len: 3,
                filter: Some("Marker"),
            }
        );
    }
}
