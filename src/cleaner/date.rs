//! Free-text date parsing.
//!
//! Incident dates arrive as `18-Jun-2023`, `Reported 03-Jun-2023`,
//! `Jun-2023`, `2023-06-18` or just `2023`. Each value is classified by how
//! much of a calendar date it carries.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::records::MonthName;

const MONTH_PATTERN: &str = "(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";

static REPORTED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^reported\s+").expect("valid regex"));
static COMPLETE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(0?[1-9]|[12][0-9]|3[01])-{MONTH_PATTERN}-(\d{{4}})$"))
        .expect("valid regex")
});
static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{MONTH_PATTERN}-(\d{{4}})$")).expect("valid regex"));
static ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));
static YEAR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DateQuality {
    Complete,
    MonthYear,
    Iso,
    YearOnly,
    Unknown,
}

impl fmt::Display for DateQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateQuality::Complete => "Complete",
            DateQuality::MonthYear => "Month_year",
            DateQuality::Iso => "Iso",
            DateQuality::YearOnly => "Year_only",
            DateQuality::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub quality: DateQuality,
    pub year: Option<i32>,
    pub month: Option<MonthName>,
}

impl ParsedDate {
    fn unknown() -> Self {
        Self {
            quality: DateQuality::Unknown,
            year: None,
            month: None,
        }
    }

    fn from_calendar(quality: DateQuality, year: i32, month: u32, day: u32) -> Self {
        // Rejects impossible dates such as 31-feb.
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(_) => Self {
                quality,
                year: Some(year),
                month: MonthName::from_number(month),
            },
            None => Self::unknown(),
        }
    }
}

/// Lowercases, trims and strips a leading `reported `.
pub fn normalize_date_text(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    REPORTED_PREFIX.replace(&lower, "").into_owned()
}

/// Parses a raw date value. `impute_day` completes `mon-YYYY` values.
pub fn parse_date(raw: &str, impute_day: u32) -> ParsedDate {
    let text = normalize_date_text(raw);

    if let Some(caps) = COMPLETE.captures(&text) {
        let day = caps[1].parse().unwrap_or(0);
        let month = month_from_abbr(&caps[2]);
        let year = caps[3].parse().unwrap_or(0);
        return ParsedDate::from_calendar(DateQuality::Complete, year, month, day);
    }

    if let Some(caps) = MONTH_YEAR.captures(&text) {
        let month = month_from_abbr(&caps[1]);
        let year = caps[2].parse().unwrap_or(0);
        return ParsedDate::from_calendar(DateQuality::MonthYear, year, month, impute_day);
    }

    if let Some(caps) = ISO.captures(&text) {
        let year = caps[1].parse().unwrap_or(0);
        let month = caps[2].parse().unwrap_or(0);
        let day = caps[3].parse().unwrap_or(0);
        return ParsedDate::from_calendar(DateQuality::Iso, year, month, day);
    }

    if let Some(caps) = YEAR_ONLY.captures(&text) {
        return ParsedDate {
            quality: DateQuality::YearOnly,
            year: caps[1].parse().ok(),
            month: None,
        };
    }

    ParsedDate::unknown()
}

fn month_from_abbr(abbr: &str) -> u32 {
    MonthName::parse(abbr).map_or(0, MonthName::number)
}

/// Parses a standalone year cell. Accepts `1995`, `1995.0` and padded
/// variants; anything that is not a whole number is rejected.
pub fn parse_year(raw: &str) -> Option<i32> {
    let text = raw.trim();
    if let Ok(year) = text.parse::<i32>() {
        return Some(year);
    }
    let value = text.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value.abs() < i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}
