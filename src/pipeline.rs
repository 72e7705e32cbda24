use tracing::info;

use crate::aggregate::{Seasonality, build_seasonality};
use crate::cleaner::clean_records;
use crate::config::CleaningConfig;
use crate::records::{CleanRecord, RawRecord};
use crate::stats::RunReport;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub clean: Vec<CleanRecord>,
    pub seasonality: Seasonality,
    pub report: RunReport,
}

/// Cleans `raw` and aggregates the result. Tables are always rebuilt from
/// scratch; nothing is carried over between runs.
pub fn run_pipeline(raw: &[RawRecord], config: &CleaningConfig) -> PipelineOutput {
    let cleaned = clean_records(raw, config);
    let seasonality = build_seasonality(&cleaned.records);
    let report = RunReport::new(cleaned.stats, seasonality.check);

    info!(
        read = report.cleaning.records_read,
        retained = report.cleaning.records_retained,
        dropped = report.cleaning.records_dropped,
        groups = seasonality.records.len(),
        fatal_rate_pct = report.fatal_rate_pct,
        "Run summary"
    );

    PipelineOutput {
        clean: cleaned.records,
        seasonality,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_grouping_fields_collapse_to_one_row() {
        let row = |line: u64, case: &str| {
            RawRecord::from_pairs(
                line,
                [
                    ("Case Number", case),
                    ("Date", "12-Aug-2015"),
                    ("Country", "South Africa"),
                    ("Time", "10h00"),
                    ("Fatal Y/N", "N"),
                ],
            )
        };
        let out = run_pipeline(&[row(1, "a"), row(2, "b")], &CleaningConfig::default());

        assert_eq!(out.clean.len(), 2);
        assert_eq!(out.seasonality.records.len(), 1);
        assert_eq!(out.seasonality.records[0].attack_count, 2);
        assert!(out.report.cube.integrity_ok);
    }

    #[test]
    fn test_dropped_record_appears_in_neither_table() {
        let kept = RawRecord::from_pairs(
            1,
            [("Date", "12-Aug-2015"), ("Country", "Fiji"), ("Fatal Y/N", "Y")],
        );
        let no_year = RawRecord::from_pairs(
            2,
            [("Case Number", "lost"), ("Country", "Tonga"), ("Month", "May"), ("Fatal Y/N", "Y")],
        );
        let out = run_pipeline(&[kept, no_year], &CleaningConfig::default());

        assert!(out.clean.iter().all(|r| r.country != "Tonga"));
        assert!(out.seasonality.records.iter().all(|r| r.country != "Tonga"));
        assert_eq!(out.report.cleaning.records_dropped, 1);
    }

    #[test]
    fn test_empty_input_runs_cleanly() {
        let out = run_pipeline(&[], &CleaningConfig::default());
        assert!(out.clean.is_empty());
        assert!(out.seasonality.records.is_empty());
        assert_eq!(out.report.fatal_rate_pct, 0.0);
    }
}
