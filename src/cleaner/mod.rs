//! Raw record cleaning.
//!
//! Turns heterogeneous raw rows into one [`CleanRecord`] per attack. Records
//! are never merged or split: each one is either kept or dropped with a
//! single counted [`DropReason`]. Retained case ids are unique within a
//! run; repeats get a line-based suffix. Secondary fields that cannot be parsed
//! (time of day) degrade to `Unknown` instead of dropping the record.

pub mod case_number;
pub mod country;
pub mod date;
pub mod fatal;
pub mod time;

use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::{CleaningConfig, UnknownTimePolicy};
use crate::records::{CleanRecord, MonthName, RawRecord, TimeCategory};
use crate::stats::{CleaningStats, DropReason};
use case_number::{CaseIdRegistry, CaseSource, inspect_case_columns, resolve_case_id};
use country::normalize_country;
use date::{DateQuality, ParsedDate, parse_date, parse_year};
use fatal::normalize_fatal;
use time::categorize_time;

/// Retained records plus the counters describing the run.
#[derive(Debug, Clone, Default)]
pub struct CleanOutput {
    pub records: Vec<CleanRecord>,
    pub stats: CleaningStats,
}

/// Cleans every raw record. Never fails; empty input gives empty output.
#[tracing::instrument(skip_all, fields(records = raw.len()))]
pub fn clean_records(raw: &[RawRecord], config: &CleaningConfig) -> CleanOutput {
    let mut stats = CleaningStats {
        records_read: raw.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(raw.len());
    let mut time_values: HashSet<Option<String>> = HashSet::new();
    let mut case_ids = CaseIdRegistry::default();

    for record in raw {
        let diagnostics = inspect_case_columns(record, &config.case_number_columns);
        stats.case_number_mismatches_count += usize::from(diagnostics.mismatch);
        stats.case_a_matches_pattern += usize::from(diagnostics.primary_matches_pattern);
        stats.case_b_matches_pattern += usize::from(diagnostics.fallback_matches_pattern);

        time_values.insert(
            record
                .first_of(&config.time_columns)
                .map(|(_, t)| t.trim().to_lowercase()),
        );

        match clean_record(record, config, &mut stats) {
            Ok(mut clean) => {
                let (case_id, renamed) = case_ids.claim(clean.case_id, record.line);
                if renamed {
                    debug!(line = record.line, %case_id, "Repeated case number renamed");
                    stats.case_numbers_deduplicated += 1;
                }
                clean.case_id = case_id;
                records.push(clean);
            }
            Err(reason) => {
                debug!(line = record.line, %reason, "Record dropped");
                stats.record_drop(reason);
            }
        }
    }

    stats.unique_time_values = time_values.len();
    stats.tally_retained(&records);

    info!(
        read = stats.records_read,
        retained = stats.records_retained,
        dropped = stats.records_dropped,
        "Cleaning complete"
    );

    CleanOutput { records, stats }
}

/// Cleans a single record. Checks run in a fixed order (country, year,
/// month, fatal, time) and the first failure is the drop reason.
pub fn clean_record(
    record: &RawRecord,
    config: &CleaningConfig,
    stats: &mut CleaningStats,
) -> Result<CleanRecord, DropReason> {
    let parsed = record
        .first_of(&config.date_columns)
        .map(|(_, d)| parse_date(d, config.impute_day))
        .unwrap_or(ParsedDate {
            quality: DateQuality::Unknown,
            year: None,
            month: None,
        });
    stats.record_date_quality(parsed.quality);

    let country = record
        .first_of(&config.country_columns)
        .and_then(|(_, c)| normalize_country(c, &config.country_aliases))
        .ok_or(DropReason::Country)?;

    let year = parsed
        .year
        .or_else(|| {
            record
                .first_of(&config.year_columns)
                .and_then(|(_, y)| parse_year(y))
        })
        .filter(|y| config.year_in_range(*y))
        .ok_or(DropReason::Year)?;

    let month_name = parsed
        .month
        .or_else(|| {
            record
                .first_of(&config.month_columns)
                .and_then(|(_, m)| MonthName::parse(m))
        })
        .ok_or(DropReason::Month)?;

    let fatal = record
        .first_of(&config.fatal_columns)
        .and_then(|(_, f)| normalize_fatal(f))
        .ok_or(DropReason::Fatal)?;

    let time_category = categorize_time(record.first_of(&config.time_columns).map(|(_, t)| t));
    if time_category == TimeCategory::Unknown
        && config.unknown_time_policy == UnknownTimePolicy::Drop
    {
        return Err(DropReason::Time);
    }

    let (case_id, source) = resolve_case_id(record, &config.case_number_columns);
    match source {
        CaseSource::Primary => {}
        CaseSource::Fallback => stats.case_numbers_from_fallback += 1,
        CaseSource::Synthesized => stats.case_numbers_synthesized += 1,
    }

    Ok(CleanRecord {
        case_id,
        country,
        month_name,
        time_category,
        fatal,
        year,
    })
}
