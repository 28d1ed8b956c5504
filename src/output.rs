// ==============================================================================
// output.rs - Result Export
// ==============================================================================
// Description: Write matched variants as CSV or JSON for downstream tools
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

use crate::models::{GeneVariant, SourceFormat};
use crate::processor::Annotation;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated table (spreadsheets)
    Csv,
    /// JSON report with metadata (web APIs and JavaScript)
    Json,
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// One flat CSV row
#[derive(Debug, Serialize)]
struct VariantRow<'a> {
    rsid: &'a str,
    chromosome: &'a str,
    position: &'a str,
    genotype: String,
    phenotype: &'a str,
    gene: &'a str,
    /// Notable genotypes joined with ';'
    notable: String,
}

impl<'a> From<&'a GeneVariant> for VariantRow<'a> {
    fn from(variant: &'a GeneVariant) -> Self {
        Self {
            rsid: &variant.rsid,
            chromosome: &variant.chromosome,
            position: &variant.position,
            genotype: variant.genotype.map(|g| g.to_string()).unwrap_or_default(),
            phenotype: &variant.phenotype,
            gene: &variant.gene,
            notable: variant
                .notable
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// JSON export document
#[derive(Debug, Serialize)]
pub struct AnnotationReport<'a> {
    pub generated_at: DateTime<Utc>,
    /// Name of the raw data file
    pub source: &'a str,
    pub format: SourceFormat,
    /// Raw rows scanned
    pub rows_scanned: usize,
    /// Reference hits before notable matching
    pub reference_hits: usize,
    pub total: usize,
    pub variants: &'a [GeneVariant],
}

impl<'a> AnnotationReport<'a> {
    pub fn new(source: &'a str, annotation: &'a Annotation) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            format: annotation.config.format,
            rows_scanned: annotation.rows,
            reference_hits: annotation.hits,
            total: annotation.matched.len(),
            variants: &annotation.matched,
        }
    }
}

/// Write variants as CSV with a header row
pub fn write_csv<W: Write>(writer: W, variants: &[GeneVariant]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for variant in variants {
        csv_writer
            .serialize(VariantRow::from(variant))
            .with_context(|| format!("Failed to write CSV row for {}", variant.rsid))?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;

    info!("CSV output complete: {} variants", variants.len());
    Ok(())
}

/// Write a pretty-printed JSON report
pub fn write_json<W: Write>(writer: W, report: &AnnotationReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(writer, report).context("Failed to write JSON output")?;

    info!("JSON output complete: {} variants", report.total);
    Ok(())
}

/// Write `annotation` in `format`
pub fn write_annotation<W: Write>(
    writer: W,
    format: OutputFormat,
    source: &str,
    annotation: &Annotation,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, &annotation.matched),
        OutputFormat::Json => write_json(writer, &AnnotationReport::new(source, annotation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ParseConfig;
    use crate::models::Genotype;
    use crate::reference::{ReferenceDataset, ReferenceEntry};

    fn annotation() -> Annotation {
        let reference: ReferenceDataset = [
            (
                "rs429358".to_string(),
                ReferenceEntry::new("Alzheimer's risk", Some("APOE"), &["CC", "CT"]),
            ),
            (
                "rs1801133".to_string(),
                ReferenceEntry::new("MTHFR C677T", None, &["AA"]),
            ),
        ]
        .into_iter()
        .collect();

        let matched = vec![
            reference
                .annotate("rs429358", "19", "45411941", Genotype::parse("TC"))
                .unwrap(),
            reference
                .annotate("rs1801133", "1", "11856378", Genotype::parse("AA"))
                .unwrap(),
        ];

        Annotation {
            config: ParseConfig::new(SourceFormat::Genome23andMe, 51_200, 1_000),
            matched,
            hits: 3,
            rows: 10,
        }
    }

    #[test]
    fn test_write_csv() {
        let annotation = annotation();
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &annotation.matched).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rsid,chromosome,position,genotype,phenotype,gene,notable");
        assert_eq!(lines[1], "rs429358,19,45411941,TC,Alzheimer's risk,APOE,CC;CT");
        assert_eq!(lines[2], "rs1801133,1,11856378,AA,MTHFR C677T,,AA");
    }

    #[test]
    fn test_write_json() {
        let annotation = annotation();
        let mut buffer = Vec::new();
        write_annotation(&mut buffer, OutputFormat::Json, "genome.txt", &annotation).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["source"], "genome.txt");
        assert_eq!(value["format"], "23andme");
        assert_eq!(value["total"], 2);
        assert_eq!(value["reference_hits"], 3);
        assert_eq!(value["variants"][0]["genotype"], "TC");
        assert_eq!(value["variants"][1]["gene"], "");
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
