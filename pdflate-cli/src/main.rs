//! pdflate CLI - zlib compression for PDF stream data
//!
//! Compresses files into zlib streams suitable for `/Filter /FlateDecode`,
//! leaving alone anything that would not get smaller.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{CompressOptions, EngineArgs, cmd_checksum, cmd_compress, cmd_info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdflate")]
#[command(author, version, about = "Zlib compression for PDF stream data")]
#[command(long_about = "
pdflate compresses PDF stream data into zlib (FlateDecode) streams.
Files that would not get smaller are reported and left uncompressed.

Examples:
  pdflate compress page1.bin page2.bin
  pdflate compress -o out/ --suffix .flate *.bin
  pdflate info content.bin --json
  pdflate checksum page1.bin page2.bin

Set RUST_LOG=debug to see per-block decisions.
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files into zlib streams
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (next to each input if not given)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suffix appended to output file names
        #[arg(short, long, default_value = ".zz")]
        suffix: String,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show how a file would compress without writing anything
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print the Adler-32 checksum of files
    Checksum {
        /// Files to checksum
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            suffix,
            json,
            progress,
            engine,
        } => cmd_compress(
            &files,
            &CompressOptions {
                output: output.as_deref(),
                suffix: &suffix,
                json,
                progress,
                engine,
            },
        ),
        Commands::Info { file, json, engine } => cmd_info(&file, json, &engine),
        Commands::Checksum { files } => cmd_checksum(&files),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
