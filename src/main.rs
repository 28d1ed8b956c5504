// ==============================================================================
// main.rs - Genotype Annotator Entry Point
// ==============================================================================
// Description: Annotate a 23andMe / AncestryDNA / VCF export from the shell
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genotype_annotator::output::{write_annotation, OutputFormat};
use genotype_annotator::{annotate_path, MatchOptions, ParserSettings, Progress, ReferenceDataset};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw data file (23andMe, AncestryDNA, or VCF)
    input: PathBuf,

    /// Reference dataset (JSON keyed by rsID)
    #[arg(short, long, env = "GENOTYPE_REFERENCE")]
    reference: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Output path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chunk size in bytes for files up to 100 MiB
    #[arg(long, env = "GENOTYPE_CHUNK_SIZE", default_value_t = genotype_annotator::config::CHUNK_SIZE)]
    chunk_size: usize,

    /// Also match genotypes reported on the opposite strand
    #[arg(long)]
    strand_tolerant: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for exported data
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genotype_annotator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    info!("Genotype annotator starting: {:?}", args.input);

    let reference = ReferenceDataset::from_path(&args.reference)
        .with_context(|| format!("Failed to load reference dataset {:?}", args.reference))?;
    if reference.is_empty() {
        warn!("Reference dataset is empty; no variants can match");
    }

    let settings = ParserSettings::default().with_chunk_size(args.chunk_size);
    let options = MatchOptions {
        strand_tolerant: args.strand_tolerant,
    };

    let mut last_logged = 0u32;
    let on_progress = move |progress: Progress| match progress {
        Progress::Chunk { percent } => {
            let decile = (percent / 10.0) as u32;
            if decile > last_logged {
                last_logged = decile;
                info!("Progress: {:.0}%", percent);
            } else {
                debug!("Progress: {:.1}%", percent);
            }
        }
        Progress::Complete => info!("Parse complete"),
    };

    let annotation = annotate_path(
        args.input.clone(),
        Arc::new(reference),
        settings,
        options,
        on_progress,
    )
    .await
    .with_context(|| format!("Failed to annotate {:?}", args.input))?;

    info!(
        "{} notable variants ({} reference hits, {} rows)",
        annotation.matched.len(),
        annotation.hits,
        annotation.rows
    );

    let source_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            write_annotation(&mut writer, args.format, &source_name, &annotation)?;
            writer.flush().context("Failed to flush output file")?;
            info!("Wrote {} output: {:?}", args.format.extension(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_annotation(&mut writer, args.format, &source_name, &annotation)?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
