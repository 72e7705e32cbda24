//! Output formatting and persistence for clean and seasonality tables.
//!
//! Supports pretty-printing, JSON reports, and CSV (optionally gzipped).

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::records::{AggregateRecord, CleanRecord};
use crate::stats::RunReport;

pub const CLEAN_HEADER: [&str; 6] = [
    "Case_Number_final",
    "Country",
    "Month_name",
    "Time_category",
    "Fatal Y/N",
    "Year_final",
];

pub const SEASONALITY_HEADER: [&str; 5] = [
    "Country",
    "Month_name",
    "Time_category",
    "Fatal Y/N",
    "Attack_Count",
];

/// Logs the run report using Rust's debug pretty-print format.
pub fn print_pretty(report: &RunReport) {
    debug!("{:#?}", report);
}

/// Logs the run report as pretty-printed JSON.
pub fn print_json(report: &RunReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the report as pretty JSON to `path`.
pub fn write_report_json(path: &str, report: &RunReport) -> Result<()> {
    let file = create_file(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    info!(path, "Run report written");
    Ok(())
}

/// Writes the clean table, replacing any existing file.
pub fn write_clean_csv(path: &str, records: &[CleanRecord]) -> Result<()> {
    write_table(path, &CLEAN_HEADER, records)
}

/// Writes the seasonality table, replacing any existing file.
pub fn write_seasonality_csv(path: &str, records: &[AggregateRecord]) -> Result<()> {
    write_table(path, &SEASONALITY_HEADER, records)
}

/// Loads a clean table previously written by [`write_clean_csv`].
pub fn read_clean_csv(path: &str) -> Result<Vec<CleanRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open clean table '{path}'"))?;
    let reader: Box<dyn Read> = if path.ends_with(".gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: CleanRecord =
            result.with_context(|| format!("invalid row in clean table '{path}'"))?;
        rows.push(record);
    }

    Ok(rows)
}

fn create_file(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory for '{path}'"))?;
        }
    }
    File::create(path).with_context(|| format!("failed to create '{path}'"))
}

/// Header is written explicitly so empty tables still get one.
fn write_table<T: Serialize>(path: &str, header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let contents = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to encode '{path}': {}", e.error()))?;

    let mut file = BufWriter::new(create_file(path)?);
    if path.ends_with(".gz") {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&contents)?;
        encoder.finish()?.flush()?;
    } else {
        file.write_all(&contents)?;
        file.flush()?;
    }

    info!(path, rows = rows.len(), "Table written");
    Ok(())
}
