//! Raw input reader for delimited shark-encounter exports.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::records::RawRecord;

/// Raw rows plus the count of rows the CSV reader could not decode.
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub records: Vec<RawRecord>,
    pub malformed_rows: usize,
}

/// Reads raw records from `path`. Files ending in `.gz` are decompressed.
///
/// A missing or empty file yields no records rather than an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be opened.
#[tracing::instrument]
pub fn read_raw_records(path: &str) -> Result<ParsedInput> {
    let p = Path::new(path);
    if !p.exists() {
        warn!(path, "Input file not found, continuing with no records");
        return Ok(ParsedInput::default());
    }

    let file = File::open(p).with_context(|| format!("failed to open input '{path}'"))?;
    let reader: Box<dyn Read> = if path.ends_with(".gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let parsed = parse_raw_records(reader);
    if parsed.records.is_empty() {
        warn!(path, "Input file contained no records");
    }
    Ok(parsed)
}

/// Parses raw records from any reader with a header row.
///
/// Rows the reader cannot decode are skipped and counted. Rows with no
/// non-blank cells are skipped silently.
pub fn parse_raw_records<R: Read>(reader: R) -> ParsedInput {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut parsed = ParsedInput::default();

    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            warn!(error = %e, "Could not read header row");
            return parsed;
        }
    };
    debug!(columns = headers.len(), "Header row read");

    for (i, result) in rdr.records().enumerate() {
        let line = i as u64 + 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed row");
                parsed.malformed_rows += 1;
                continue;
            }
        };

        let record = RawRecord::from_pairs(line, headers.iter().zip(row.iter()));
        if !record.is_empty() {
            parsed.records.push(record);
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::io::Write;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_parse_basic_rows() {
        let data = "Case Number,Date,Country,Fatal Y/N\n\
                    2023.06.18,18-Jun-2023,USA,N\n\
                    2023.06.10,10-Jun-2023, australia ,Y\n";
        let parsed = parse_raw_records(data.as_bytes());

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.malformed_rows, 0);
        assert_eq!(parsed.records[1].get("country"), Some("australia"));
        assert_eq!(parsed.records[1].line, 2);
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let data = "Country,Date,Time\nFiji,Jun-2001\n";
        let parsed = parse_raw_records(data.as_bytes());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].get("Time"), None);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let data = "Country,Date\n,\nFiji,Jun-2001\n";
        let parsed = parse_raw_records(data.as_bytes());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].line, 2);
    }

    #[test]
    fn test_invalid_utf8_row_is_counted() {
        let mut data = b"Country,Date\nFiji,Jun-2001\n".to_vec();
        data.extend_from_slice(&[0xFF, 0xFE, b',', b'x', b'\n']);
        data.extend_from_slice(b"Tonga,Jul-2002\n");

        let parsed = parse_raw_records(data.as_slice());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.malformed_rows, 1);
    }

    #[test]
    fn test_empty_reader_yields_nothing() {
        let parsed = parse_raw_records("".as_bytes());
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        let parsed = read_raw_records(&temp_path("shark_seasonality_missing_input.csv")).unwrap();
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_reads_gzip_input() {
        let path = temp_path("shark_seasonality_test_input.csv.gz");
        let _ = fs::remove_file(&path);

        let file = fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"Country,Date\nFiji,Jun-2001\n").unwrap();
        encoder.finish().unwrap();

        let parsed = read_raw_records(&path).unwrap();
        assert_eq!(parsed.records.len(), 1);

        fs::remove_file(&path).unwrap();
    }
}
