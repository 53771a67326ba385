//! radlog - Radiation monitor log decoder
//!
//! Reads one binary instrument log and prints its measurements as a table
//! with every dose rate in µSv/h.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use radlog::export::{self, OutputFormat};
use radlog::parsers::{AlignmentMode, RadMonitor, RecordLayout};
use radlog::settings::DecoderSettings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Binary log file to decode
    file: PathBuf,

    /// Output format (defaults to the saved setting)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Total record length for extended layouts
    #[arg(long)]
    record_length: Option<usize>,

    /// Require both the padding signature and whole-record length when aligning
    #[arg(long)]
    strict_alignment: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the effective layout, alignment and format as the new defaults
    #[arg(long)]
    save_settings: bool,
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout stays clean for the table
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => DecoderSettings::load_from(path),
        None => DecoderSettings::load(),
    };

    let layout = match cli.record_length {
        Some(len) => RecordLayout::from_len(len)?,
        None => settings.layout,
    };
    let alignment = if cli.strict_alignment {
        AlignmentMode::Strict
    } else {
        settings.alignment
    };
    let format = cli.format.unwrap_or(settings.output);

    if cli.save_settings {
        let effective = DecoderSettings {
            layout,
            alignment,
            output: format,
            ..settings
        };
        let saved = match &cli.config {
            Some(path) => effective.save_to(path),
            None => effective.save(),
        };
        saved.map_err(anyhow::Error::msg)?;
    }

    let data = std::fs::read(&cli.file)
        .with_context(|| format!("Cannot read log file '{}'", cli.file.display()))?;

    let dataset = RadMonitor::new(layout, alignment)
        .parse_binary(&data)
        .with_context(|| format!("Failed to decode '{}'", cli.file.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    export::write_dataset(&dataset, format, &mut out)?;
    out.flush()?;

    Ok(())
}
