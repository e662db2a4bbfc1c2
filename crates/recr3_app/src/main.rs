//! recr3 - recovers Canon CR3 image files embedded in memory dumps,
//! disk images and other unstructured binary blobs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use recr3_core::{run_carve, ChunkPolicy, Extractor, Signature};
use recr3_io::Reader;

#[derive(Parser, Debug)]
#[command(name = "recr3", version)]
#[command(about = "Recover Canon CR3 files from memory dumps")]
struct Args {
    /// Memory dump or disk image to scan
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Directory receiving the recovered files
    #[arg(long, value_name = "DIR")]
    outdir: PathBuf,

    /// Be verbose
    #[arg(short, long)]
    verbose: bool,

    /// Extension given to recovered files
    #[arg(long, value_name = "EXT", default_value = "cr3")]
    ext: String,

    /// Zero-pad the number in output filenames to this width
    #[arg(long, value_name = "N", default_value_t = 0)]
    width: usize,

    /// Name of the last CR3 chunk
    #[arg(long, value_name = "NAME", default_value = "mdat")]
    lastchunk: String,

    /// Maximum number of CR3 chunks to keep per file
    #[arg(long, value_name = "N", conflicts_with = "lastchunk",
          value_parser = clap::value_parser!(u64).range(1..))]
    maxchunks: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    validate(&args);
    init_logger(args.verbose)?;

    info!("Processing {}", args.input.display());

    // two independent cursors on the same input: the scanner's position
    // is never disturbed by the resolver or the extractor
    let mut scan_reader = Reader::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let mut carve_reader = Reader::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let policy = match args.maxchunks {
        Some(n) => ChunkPolicy::ByCount(n),
        None => ChunkPolicy::ByName(args.lastchunk.clone().into_bytes()),
    };

    let mut extractor = Extractor::new(&args.outdir, args.ext.clone(), args.width);

    let count = run_carve(
        &mut scan_reader,
        &mut carve_reader,
        Signature::cr3(),
        &policy,
        &mut extractor,
    )?;

    if count > 0 {
        info!("Restored {} file(s)", count);
    } else {
        info!("No CR3 files found");
    }

    Ok(())
}

/// Argument checks that clap cannot express; failures exit as usage
/// errors before any scanning starts.
fn validate(args: &Args) {
    let mut cmd = Args::command();

    if !args.input.is_file() {
        cmd.error(
            ErrorKind::ValueValidation,
            format!(
                "{} does not exist or is not a regular file",
                args.input.display()
            ),
        )
        .exit();
    }

    if !args.outdir.is_dir() {
        cmd.error(
            ErrorKind::ValueValidation,
            format!("{} is not a directory or does not exist", args.outdir.display()),
        )
        .exit();
    }

    if args.maxchunks.is_none() && args.lastchunk.is_empty() {
        cmd.error(ErrorKind::ValueValidation, "--lastchunk must not be empty")
            .exit();
    }
}

fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialize the logger")?;

    Ok(())
}
