//! Checksum command implementation.

use crate::utils::format_checksum;
use pdflate_core::Adler32;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

pub fn cmd_checksum(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    for path in files {
        let mut reader = BufReader::new(File::open(path)?);
        let mut adler = Adler32::new();
        let mut buf = [0u8; 64 * 1024];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            adler.update(&buf[..n]);
        }

        println!("{}  {}", format_checksum(adler.finish()), path.display());
    }

    Ok(())
}
