//! Seasonality aggregation.
//!
//! Groups clean records by `(country, month, time of day, fatality)` and
//! counts them. Grouping goes through a `BTreeMap`, so output is ordered by
//! key: country lexicographically, then calendar month, then time category,
//! then Fatal before Non-Fatal.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::records::{AggregateRecord, CleanRecord, SeasonalityKey};

/// Conservation check: every clean row is counted exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CubeCheck {
    pub rows_in: usize,
    pub attack_count_sum: usize,
    pub integrity_ok: bool,
}

impl Default for CubeCheck {
    fn default() -> Self {
        Self {
            rows_in: 0,
            attack_count_sum: 0,
            integrity_ok: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seasonality {
    pub records: Vec<AggregateRecord>,
    pub check: CubeCheck,
}

/// Builds the seasonality table from clean records.
#[tracing::instrument(skip_all, fields(rows_in = records.len()))]
pub fn build_seasonality(records: &[CleanRecord]) -> Seasonality {
    let mut groups: BTreeMap<SeasonalityKey, usize> = BTreeMap::new();
    for record in records {
        *groups.entry(record.key()).or_default() += 1;
    }

    let records_out: Vec<AggregateRecord> = groups
        .into_iter()
        .map(|(key, count)| AggregateRecord::from_key(key, count))
        .collect();

    let attack_count_sum: usize = records_out.iter().map(|r| r.attack_count).sum();
    let check = CubeCheck {
        rows_in: records.len(),
        attack_count_sum,
        integrity_ok: attack_count_sum == records.len(),
    };

    if check.integrity_ok {
        info!(groups = records_out.len(), attack_count_sum, "Seasonality built");
    } else {
        warn!(
            rows_in = check.rows_in,
            attack_count_sum, "Seasonality counts do not match input rows"
        );
    }

    Seasonality {
        records: records_out,
        check,
    }
}
