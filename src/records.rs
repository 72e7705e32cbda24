//! Record types flowing through the cleaning and aggregation stages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single data row from the raw input file.
///
/// Header names are stored trimmed and lowercased so lookups tolerate the
/// inconsistent casing found across dataset exports. Empty cells are not
/// stored at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data line (header excluded).
    pub line: u64,
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    /// Builds a record from `(column, value)` pairs. Handy for tests and for
    /// callers that already hold rows in memory.
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut record = Self::new(line);
        for (k, v) in pairs {
            record.insert(k.as_ref(), v.as_ref());
        }
        record
    }

    /// Stores `value` under `column`. Blank values are ignored.
    pub fn insert(&mut self, column: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.fields
            .insert(normalize_header(column), value.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(&normalize_header(column)).map(String::as_str)
    }

    /// Returns the first non-empty value among `columns`, together with the
    /// index of the column it came from.
    pub fn first_of<S: AsRef<str>>(&self, columns: &[S]) -> Option<(usize, &str)> {
        columns
            .iter()
            .enumerate()
            .find_map(|(i, c)| self.get(c.as_ref()).map(|v| (i, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub(crate) fn normalize_header(column: &str) -> String {
    column.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub const ALL: [MonthName; 12] = [
        MonthName::January,
        MonthName::February,
        MonthName::March,
        MonthName::April,
        MonthName::May,
        MonthName::June,
        MonthName::July,
        MonthName::August,
        MonthName::September,
        MonthName::October,
        MonthName::November,
        MonthName::December,
    ];

    /// Maps a 1-based month number to its name.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1..=12 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            MonthName::January => "January",
            MonthName::February => "February",
            MonthName::March => "March",
            MonthName::April => "April",
            MonthName::May => "May",
            MonthName::June => "June",
            MonthName::July => "July",
            MonthName::August => "August",
            MonthName::September => "September",
            MonthName::October => "October",
            MonthName::November => "November",
            MonthName::December => "December",
        }
    }

    /// Parses a full name, a three-letter abbreviation, or a number 1-12.
    /// Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<u32>() {
            return Self::from_number(n);
        }
        Self::ALL.into_iter().find(|m| {
            let name = m.name().to_lowercase();
            name == text || (text.len() == 3 && name.starts_with(&text))
        })
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeCategory {
    Morning,
    Afternoon,
    Evening,
    Night,
    Unknown,
}

impl fmt::Display for TimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeCategory::Morning => "Morning",
            TimeCategory::Afternoon => "Afternoon",
            TimeCategory::Evening => "Evening",
            TimeCategory::Night => "Night",
            TimeCategory::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Fatality {
    Fatal,
    #[serde(rename = "Non-Fatal")]
    NonFatal,
}

impl fmt::Display for Fatality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fatality::Fatal => "Fatal",
            Fatality::NonFatal => "Non-Fatal",
        })
    }
}

/// One normalized attack, a row of `shark_attacks_clean.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "Case_Number_final")]
    pub case_id: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Month_name")]
    pub month_name: MonthName,
    #[serde(rename = "Time_category")]
    pub time_category: TimeCategory,
    #[serde(rename = "Fatal Y/N")]
    pub fatal: Fatality,
    #[serde(rename = "Year_final")]
    pub year: i32,
}

impl CleanRecord {
    pub fn key(&self) -> SeasonalityKey {
        SeasonalityKey {
            country: self.country.clone(),
            month_name: self.month_name,
            time_category: self.time_category,
            fatal: self.fatal,
        }
    }
}

/// Grouping key of the seasonality table. Field order defines output order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonalityKey {
    pub country: String,
    pub month_name: MonthName,
    pub time_category: TimeCategory,
    pub fatal: Fatality,
}

/// One row of `seasonality_analysis.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Month_name")]
    pub month_name: MonthName,
    #[serde(rename = "Time_category")]
    pub time_category: TimeCategory,
    #[serde(rename = "Fatal Y/N")]
    pub fatal: Fatality,
    #[serde(rename = "Attack_Count")]
    pub attack_count: usize,
}

impl AggregateRecord {
    pub fn from_key(key: SeasonalityKey, attack_count: usize) -> Self {
        Self {
            country: key.country,
            month_name: key.month_name,
            time_category: key.time_category,
            fatal: key.fatal,
            attack_count,
        }
    }

    pub fn key(&self) -> SeasonalityKey {
        SeasonalityKey {
            country: self.country.clone(),
            month_name: self.month_name,
            time_category: self.time_category,
            fatal: self.fatal,
        }
    }
}
