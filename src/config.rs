//! Cleaning configuration.
//!
//! Every field has a default matching the Global Shark Attack File export, so
//! an empty JSON object is a valid config file:
//! ```json
//! {
//!   "min_year": 1900,
//!   "unknown_time_policy": "drop",
//!   "country_aliases": { "Reunion": "Réunion" }
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Year bounds are limited to four-digit years.
const YEAR_BOUNDS: RangeInclusive<i32> = 1000..=9999;

/// What to do with records whose time of day cannot be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTimePolicy {
    /// Keep the record with `Time_category = Unknown`.
    #[default]
    Retain,
    /// Drop the record and count it.
    Drop,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    // Candidate input columns, first non-empty wins.
    pub case_number_columns: Vec<String>,
    pub country_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub year_columns: Vec<String>,
    pub month_columns: Vec<String>,
    pub time_columns: Vec<String>,
    pub fatal_columns: Vec<String>,

    pub min_year: i32,
    /// Defaults to the current calendar year when unset.
    pub max_year: Option<i32>,
    /// Day used to complete `mon-YYYY` dates.
    pub impute_day: u32,
    pub unknown_time_policy: UnknownTimePolicy,
    /// Title-cased spelling → canonical spelling.
    pub country_aliases: HashMap<String, String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            case_number_columns: columns(&["Case Number", "Case Number.1"]),
            country_columns: columns(&["Country"]),
            date_columns: columns(&["Date"]),
            year_columns: columns(&["Year"]),
            month_columns: columns(&["Month"]),
            time_columns: columns(&["Time"]),
            fatal_columns: columns(&["Fatal Y/N", "Fatal (Y/N)", "Fatal"]),
            min_year: 1500,
            max_year: None,
            impute_day: 1,
            unknown_time_policy: UnknownTimePolicy::Retain,
            country_aliases: default_country_aliases(),
        }
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_country_aliases() -> HashMap<String, String> {
    [
        ("Usa", "USA"),
        ("Uk", "UK"),
        ("Uae", "UAE"),
        ("United States", "USA"),
        ("United States Of America", "USA"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl CleaningConfig {
    /// Loads the config from a JSON file at `path`. Missing keys fall back to
    /// their defaults; user aliases are merged over the default alias table.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: CleaningConfig = serde_json::from_str(content)?;
        let mut aliases = default_country_aliases();
        aliases.extend(config.country_aliases.drain());
        config.country_aliases = aliases;
        config.validate()?;
        Ok(config)
    }

    /// Upper bound for plausible years.
    pub fn max_year(&self) -> i32 {
        self.max_year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year()).contains(&year)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, year) in [("min_year", self.min_year), ("max_year", self.max_year())] {
            if !YEAR_BOUNDS.contains(&year) {
                anyhow::bail!(
                    "{name} must be a four-digit year ({}..={}), got {year}",
                    YEAR_BOUNDS.start(),
                    YEAR_BOUNDS.end()
                );
            }
        }
        if self.min_year > self.max_year() {
            anyhow::bail!(
                "min_year ({}) is greater than max_year ({})",
                self.min_year,
                self.max_year()
            );
        }
        if !(1..=28).contains(&self.impute_day) {
            anyhow::bail!("impute_day must be between 1 and 28, got {}", self.impute_day);
        }
        Ok(())
    }
}
