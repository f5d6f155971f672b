//! Info command implementation.

use super::EngineArgs;
use crate::utils::StreamReport;
use std::path::Path;

pub fn cmd_info(
    file: &Path,
    json: bool,
    engine: &EngineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = std::fs::read(file)?;
    let result = engine.engine()?.compress(&input)?;
    let report = StreamReport::new(file, &input, &result);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Stream Information");
    println!("==================");
    println!("File: {}", report.file);
    println!("Size: {} bytes", report.input_size);
    println!("Adler-32: {}", report.adler32);
    println!("Outcome: {}", report.outcome);

    if let (Some(size), Some(savings)) = (report.compressed_size, report.space_savings) {
        println!();
        println!("Compressed:");
        println!("  Size: {} bytes", size);
        println!("  Space savings: {:.1}%", savings);
    }

    if let Some(blocks) = &report.blocks {
        println!();
        println!("Blocks:");
        println!("  Stored: {}", blocks.stored);
        println!("  Static: {}", blocks.static_codes);
        println!("  Dynamic: {}", blocks.dynamic);
    }

    Ok(())
}
