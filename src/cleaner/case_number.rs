use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::records::RawRecord;

static CASE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{2}\.\d{2}").expect("valid regex"));

/// Where a record's case id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSource {
    Primary,
    Fallback,
    Synthesized,
}

/// Picks the first non-empty case-number column, or synthesizes `ROW-<line>`.
pub fn resolve_case_id(record: &RawRecord, columns: &[String]) -> (String, CaseSource) {
    match record.first_of(columns) {
        Some((0, value)) => (value.to_string(), CaseSource::Primary),
        Some((_, value)) => (value.to_string(), CaseSource::Fallback),
        None => (format!("ROW-{}", record.line), CaseSource::Synthesized),
    }
}

/// Per-record view of the primary and first fallback case-number columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseDiagnostics {
    /// Both columns are filled and disagree.
    pub mismatch: bool,
    pub primary_matches_pattern: bool,
    pub fallback_matches_pattern: bool,
}

/// Compares the first two case-number columns and checks each against the
/// `YYYY.MM.DD` prefix used by the Global Shark Attack File.
pub fn inspect_case_columns(record: &RawRecord, columns: &[String]) -> CaseDiagnostics {
    let primary = columns.first().and_then(|c| record.get(c));
    let fallback = columns.get(1).and_then(|c| record.get(c));
    let fits = |v: Option<&str>| v.is_some_and(|v| CASE_PATTERN.is_match(v));

    CaseDiagnostics {
        mismatch: matches!((primary, fallback), (Some(a), Some(b)) if a != b),
        primary_matches_pattern: fits(primary),
        fallback_matches_pattern: fits(fallback),
    }
}

/// Hands out case ids that are unique within one run. A repeated id gets
/// the record's line appended (`2023.06.18-12`), then a counter if that is
/// taken too.
#[derive(Debug, Default)]
pub struct CaseIdRegistry {
    seen: HashSet<String>,
}

impl CaseIdRegistry {
    /// Returns the id to use and whether it had to be changed.
    pub fn claim(&mut self, id: String, line: u64) -> (String, bool) {
        if self.seen.insert(id.clone()) {
            return (id, false);
        }
        let mut candidate = format!("{id}-{line}");
        let mut n = 2;
        while self.seen.contains(&candidate) {
            candidate = format!("{id}-{line}-{n}");
            n += 1;
        }
        self.seen.insert(candidate.clone());
        (candidate, true)
    }
}
