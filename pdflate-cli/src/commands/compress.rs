//! Compress command implementation.

use super::EngineArgs;
use crate::utils::{StreamReport, create_progress_bar, output_path};
use log::{debug, info};
use pdflate_deflate::Deflated;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for the compress command.
pub struct CompressOptions<'a> {
    pub output: Option<&'a Path>,
    pub suffix: &'a str,
    pub json: bool,
    pub progress: bool,
    pub engine: EngineArgs,
}

pub fn cmd_compress(
    files: &[PathBuf],
    options: &CompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = options.engine.engine()?;

    if let Some(dir) = options.output {
        fs::create_dir_all(dir)?;
    }

    let pb = create_progress_bar(files.len() as u64, options.progress && !options.json);
    let mut reports = Vec::with_capacity(files.len());
    let mut compressed = 0usize;

    for path in files {
        pb.set_message(path.display().to_string());

        let input = fs::read(path)?;
        let result = engine.compress(&input)?;
        let mut report = StreamReport::new(path, &input, &result);

        match result {
            Deflated::Compressed(stream) => {
                let dest = output_path(path, options.output, options.suffix);
                fs::write(&dest, &stream.data)?;
                info!("{} -> {}", path.display(), dest.display());
                report.output = Some(dest.display().to_string());
                compressed += 1;
            }
            Deflated::NotCompressible(reason) => {
                debug!("Skipping {}: {:?}", path.display(), reason);
            }
        }

        if !options.json {
            pb.suspend(|| print_report(&report));
        }
        reports.push(report);
        pb.inc(1);
    }

    pb.finish_and_clear();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if files.len() > 1 {
        println!();
        println!(
            "{} of {} files compressed, {} left unchanged",
            compressed,
            files.len(),
            files.len() - compressed
        );
    }

    Ok(())
}

fn print_report(report: &StreamReport) {
    match (&report.output, report.compressed_size, report.space_savings) {
        (Some(output), Some(size), Some(savings)) => println!(
            "{}: {} -> {} bytes ({:.1}% saved) -> {}",
            report.file, report.input_size, size, savings, output
        ),
        _ => println!(
            "{}: {} bytes, not compressed ({})",
            report.file, report.input_size, report.outcome
        ),
    }
}
