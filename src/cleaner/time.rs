//! Time-of-day bucketing.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::records::TimeCategory;

static AM_PM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::\d{2})?\s*(a\.?m\.?|p\.?m\.?)").expect("valid regex")
});
static COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):\d{2}\b").expect("valid regex"));
static H_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})h").expect("valid regex"));
static MILITARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([01]?\d|2[0-3])[0-5]\d\s*(?:hrs?|hours)?\b").expect("valid regex")
});

/// Later entries win when several keywords appear.
const KEYWORDS: &[(&str, TimeCategory)] = &[
    ("early", TimeCategory::Morning),
    ("dawn", TimeCategory::Morning),
    ("morning", TimeCategory::Morning),
    ("afternoon", TimeCategory::Afternoon),
    ("dusk", TimeCategory::Evening),
    ("evening", TimeCategory::Evening),
    ("night", TimeCategory::Night),
];

/// Extracts an hour (0-23) from `14h00`, `7h`, `14:30`, `2pm`, `10:30 a.m.`
/// or `1430hrs`. Returns `None` when no pattern matches or the hour is out
/// of range.
pub fn extract_hour(text: &str) -> Option<u32> {
    let text = text.trim().to_lowercase();

    // `14:00 pm` is not a valid 12-hour time; let the 24-hour patterns read it.
    if let Some(hour) = AM_PM.captures(&text).and_then(|caps| twelve_hour(&caps)) {
        return Some(hour);
    }

    let hour = COLON
        .captures(&text)
        .or_else(|| H_SUFFIX.captures(&text))
        .or_else(|| MILITARY.captures(&text))
        .and_then(|caps| caps[1].parse::<u32>().ok())?;

    (hour <= 23).then_some(hour)
}

fn twelve_hour(caps: &Captures<'_>) -> Option<u32> {
    let hour: u32 = caps[1].parse().ok()?;
    let pm = caps[2].starts_with('p');
    match (hour, pm) {
        (12, false) => Some(0),
        (12, true) => Some(12),
        (1..=11, true) => Some(hour + 12),
        (1..=11, false) => Some(hour),
        _ => None,
    }
}

pub fn classify_hour(hour: Option<u32>) -> TimeCategory {
    match hour {
        Some(5..=11) => TimeCategory::Morning,
        Some(12..=16) => TimeCategory::Afternoon,
        Some(17..=19) => TimeCategory::Evening,
        Some(20..=23) | Some(0..=4) => TimeCategory::Night,
        _ => TimeCategory::Unknown,
    }
}

fn keyword_category(text: &str) -> Option<TimeCategory> {
    KEYWORDS
        .iter()
        .filter(|(word, _)| text.contains(word))
        .map(|(_, category)| *category)
        .last()
}

/// Buckets a raw time value. Keywords override an extracted hour.
pub fn categorize_time(raw: Option<&str>) -> TimeCategory {
    let Some(raw) = raw else {
        return TimeCategory::Unknown;
    };
    let text = raw.trim().to_lowercase();
    keyword_category(&text).unwrap_or_else(|| classify_hour(extract_hour(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hour_formats() {
        assert_eq!(extract_hour("18h00"), Some(18));
        assert_eq!(extract_hour("7h"), Some(7));
        assert_eq!(extract_hour("07h30"), Some(7));
        assert_eq!(extract_hour("14:30"), Some(14));
        assert_eq!(extract_hour("2pm"), Some(14));
        assert_eq!(extract_hour("10:30 a.m."), Some(10));
        assert_eq!(extract_hour("12 am"), Some(0));
        assert_eq!(extract_hour("1430hrs"), Some(14));
        assert_eq!(extract_hour("0915"), Some(9));
        assert_eq!(extract_hour("11h00 / 11h30"), Some(11));
    }

    #[test]
    fn test_extract_hour_rejects_garbage() {
        assert_eq!(extract_hour("?"), None);
        assert_eq!(extract_hour("25h00"), None);
        assert_eq!(extract_hour("sometime"), None);
    }

    #[test]
    fn test_out_of_range_am_pm_hour_reads_as_24_hour() {
        assert_eq!(extract_hour("14:00 pm"), Some(14));
        assert_eq!(extract_hour("18h00 pm"), Some(18));
        assert_eq!(extract_hour("25 pm"), None);
        assert_eq!(categorize_time(Some("14:00 pm")), TimeCategory::Afternoon);
    }

    #[test]
    fn test_classify_hour_boundaries() {
        assert_eq!(classify_hour(Some(4)), TimeCategory::Night);
        assert_eq!(classify_hour(Some(5)), TimeCategory::Morning);
        assert_eq!(classify_hour(Some(11)), TimeCategory::Morning);
        assert_eq!(classify_hour(Some(12)), TimeCategory::Afternoon);
        assert_eq!(classify_hour(Some(16)), TimeCategory::Afternoon);
        assert_eq!(classify_hour(Some(17)), TimeCategory::Evening);
        assert_eq!(classify_hour(Some(19)), TimeCategory::Evening);
        assert_eq!(classify_hour(Some(20)), TimeCategory::Night);
        assert_eq!(classify_hour(Some(0)), TimeCategory::Night);
        assert_eq!(classify_hour(None), TimeCategory::Unknown);
    }

    #[test]
    fn test_keywords_override_hour() {
        assert_eq!(categorize_time(Some("Late afternoon")), TimeCategory::Afternoon);
        assert_eq!(categorize_time(Some("Early morning")), TimeCategory::Morning);
        assert_eq!(categorize_time(Some("Night")), TimeCategory::Night);
        assert_eq!(categorize_time(Some("Dusk")), TimeCategory::Evening);
        assert_eq!(categorize_time(Some("09h00, night dive")), TimeCategory::Night);
    }

    #[test]
    fn test_missing_or_unparseable_time_is_unknown() {
        assert_eq!(categorize_time(None), TimeCategory::Unknown);
        assert_eq!(categorize_time(Some("?")), TimeCategory::Unknown);
    }

    #[test]
    fn test_afternoon_scenario_times() {
        assert_eq!(categorize_time(Some("14:30")), TimeCategory::Afternoon);
        assert_eq!(categorize_time(Some("15:10")), TimeCategory::Afternoon);
    }
}
