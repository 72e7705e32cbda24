use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::aggregate::CubeCheck;
use crate::records::{CleanRecord, Fatality};

const TOP_COUNTRIES: usize = 20;

/// Why a raw record was left out of the clean table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    Country,
    Year,
    Month,
    Fatal,
    Time,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropReason::Country => "country",
            DropReason::Year => "year",
            DropReason::Month => "month",
            DropReason::Fatal => "fatal",
            DropReason::Time => "time",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub value: String,
    pub count: usize,
}

/// Counters collected while cleaning.
///
/// `date_quality_counts`, `unique_time_values` and the case-column
/// diagnostics describe every record read; the value counts describe
/// retained records only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningStats {
    pub records_read: usize,
    pub records_retained: usize,
    pub records_dropped: usize,
    pub dropped_by_reason: BTreeMap<String, usize>,

    // case numbers
    pub case_numbers_from_fallback: usize,
    pub case_numbers_synthesized: usize,
    pub case_numbers_deduplicated: usize,
    pub case_number_mismatches_count: usize,
    pub case_a_matches_pattern: usize,
    pub case_b_matches_pattern: usize,

    // input diagnostics
    pub date_quality_counts: BTreeMap<String, usize>,
    pub unique_time_values: usize,

    // retained value counts
    pub time_category_counts: BTreeMap<String, usize>,
    pub fatal_counts: BTreeMap<String, usize>,
    pub month_counts: BTreeMap<String, usize>,
    pub country_counts_top: Vec<CountEntry>,
}

impl CleaningStats {
    pub fn record_drop(&mut self, reason: DropReason) {
        self.records_dropped += 1;
        *self.dropped_by_reason.entry(reason.to_string()).or_default() += 1;
    }

    pub fn dropped(&self, reason: DropReason) -> usize {
        self.dropped_by_reason
            .get(&reason.to_string())
            .copied()
            .unwrap_or(0)
    }

    pub fn record_date_quality(&mut self, quality: impl fmt::Display) {
        *self.date_quality_counts.entry(quality.to_string()).or_default() += 1;
    }

    /// Fills the value counts from the retained records.
    pub fn tally_retained(&mut self, records: &[CleanRecord]) {
        self.records_retained = records.len();

        let mut countries: HashMap<&str, usize> = HashMap::new();
        for r in records {
            *self
                .time_category_counts
                .entry(r.time_category.to_string())
                .or_default() += 1;
            *self.fatal_counts.entry(r.fatal.to_string()).or_default() += 1;
            *self.month_counts.entry(r.month_name.to_string()).or_default() += 1;
            *countries.entry(r.country.as_str()).or_default() += 1;
        }

        let mut top: Vec<CountEntry> = countries
            .into_iter()
            .map(|(value, count)| CountEntry {
                value: value.to_string(),
                count,
            })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        top.truncate(TOP_COUNTRIES);
        self.country_counts_top = top;
    }

    /// `records_read == records_retained + records_dropped`
    pub fn is_conserved(&self) -> bool {
        self.records_read == self.records_retained + self.records_dropped
    }

    pub fn fatal_rate_pct(&self) -> f64 {
        let fatal = self
            .fatal_counts
            .get(&Fatality::Fatal.to_string())
            .copied()
            .unwrap_or(0);
        pct(fatal, self.records_retained)
    }
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Summary of one pipeline run, written as the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub input: Option<String>,
    pub malformed_rows: usize,
    pub cleaning: CleaningStats,
    pub cube: CubeCheck,
    pub fatal_rate_pct: f64,
}

impl RunReport {
    pub fn new(cleaning: CleaningStats, cube: CubeCheck) -> Self {
        RunReport {
            generated_at: Utc::now(),
            input: None,
            malformed_rows: 0,
            fatal_rate_pct: cleaning.fatal_rate_pct(),
            cleaning,
            cube,
        }
    }

    /// Set input metadata (path and rows the reader could not decode)
    pub fn with_input(mut self, path: &str, malformed_rows: usize) -> Self {
        self.input = Some(path.to_string());
        self.malformed_rows = malformed_rows;
        self
    }
}
