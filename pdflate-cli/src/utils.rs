//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use pdflate_core::Adler32;
use pdflate_deflate::{BlockStats, Deflated, NotCompressible};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Where the compressed stream for `input` goes.
pub fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Block counts by encoding.
#[derive(Debug, Serialize)]
pub struct BlocksJson {
    pub stored: usize,
    #[serde(rename = "static")]
    pub static_codes: usize,
    pub dynamic: usize,
}

impl From<BlockStats> for BlocksJson {
    fn from(stats: BlockStats) -> Self {
        Self {
            stored: stats.stored,
            static_codes: stats.static_codes,
            dynamic: stats.dynamic_codes,
        }
    }
}

/// What happened to one input.
#[derive(Debug, Serialize)]
pub struct StreamReport {
    pub file: String,
    pub input_size: u64,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlocksJson>,
    pub adler32: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl StreamReport {
    pub fn new(file: &Path, input: &[u8], result: &Deflated) -> Self {
        let stream = result.stream();
        let input_size = input.len() as u64;
        let compressed_size = stream.map(|s| s.data.len() as u64);

        Self {
            file: file.display().to_string(),
            input_size,
            outcome: outcome_name(result),
            compressed_size,
            space_savings: compressed_size.map(|c| space_savings(input_size, c)),
            blocks: stream.map(|s| s.stats.into()),
            adler32: format_checksum(Adler32::checksum(input)),
            output: None,
        }
    }
}

/// Short label for a compression result.
pub fn outcome_name(result: &Deflated) -> &'static str {
    match result {
        Deflated::Compressed(_) => "compressed",
        Deflated::NotCompressible(NotCompressible::TooSmall) => "too_small",
        Deflated::NotCompressible(NotCompressible::NoGain) => "no_gain",
    }
}

/// Percentage of the input saved by compression.
pub fn space_savings(input_size: u64, compressed_size: u64) -> f64 {
    if input_size == 0 {
        return 0.0;
    }
    (1.0 - compressed_size as f64 / input_size as f64) * 100.0
}

pub fn format_checksum(checksum: u32) -> String {
    format!("{:08x}", checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("dir/page.bin"), None, ".zz"),
            PathBuf::from("dir/page.bin.zz")
        );
        assert_eq!(
            output_path(Path::new("dir/page.bin"), Some(Path::new("out")), ".flate"),
            PathBuf::from("out/page.bin.flate")
        );
    }

    #[test]
    fn test_space_savings() {
        assert_eq!(space_savings(0, 0), 0.0);
        assert_eq!(space_savings(200, 50), 75.0);
    }

    #[test]
    fn test_report_json() {
        let input = b"0 0 m 100 100 l S\n".repeat(20);
        let result = pdflate_deflate::zlib_compress(&input).unwrap();
        let report = StreamReport::new(Path::new("a.bin"), &input, &result);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "compressed");
        assert_eq!(json["input_size"], input.len() as u64);
        assert!(json["blocks"]["static"].is_u64());
        assert!(json.get("output").is_none());
    }

    #[test]
    fn test_report_not_compressible() {
        let result = pdflate_deflate::zlib_compress(b"abc").unwrap();
        let report = StreamReport::new(Path::new("a.bin"), b"abc", &result);

        assert_eq!(report.outcome, "too_small");
        assert!(report.compressed_size.is_none());
        assert_eq!(report.adler32, "024d0127");
    }
}
