use shark_seasonality::config::{CleaningConfig, UnknownTimePolicy};
use shark_seasonality::output::{read_clean_csv, write_clean_csv, write_seasonality_csv};
use shark_seasonality::parser::parse_raw_records;
use shark_seasonality::pipeline::run_pipeline;
use shark_seasonality::records::{Fatality, MonthName, TimeCategory};
use shark_seasonality::stats::DropReason;
use std::env;
use std::fs;

const SAMPLE: &[u8] = include_bytes!("fixtures/sample_attacks.csv");

#[test]
fn test_full_pipeline() {
    let parsed = parse_raw_records(SAMPLE);
    assert_eq!(parsed.records.len(), 10);

    let out = run_pipeline(&parsed.records, &CleaningConfig::default());
    let stats = &out.report.cleaning;

    assert_eq!(stats.records_read, 10);
    assert_eq!(stats.records_retained, 6);
    assert_eq!(stats.records_dropped, 4);
    assert_eq!(stats.dropped(DropReason::Country), 1);
    assert_eq!(stats.dropped(DropReason::Year), 1);
    assert_eq!(stats.dropped(DropReason::Month), 1);
    assert_eq!(stats.dropped(DropReason::Fatal), 1);
    assert_eq!(stats.case_numbers_from_fallback, 1);

    assert!(out.clean.iter().all(|r| !r.case_id.is_empty()));
    let ids: std::collections::HashSet<&str> = out.clean.iter().map(|r| r.case_id.as_str()).collect();
    assert_eq!(ids.len(), out.clean.len());
    assert_eq!(stats.case_numbers_deduplicated, 0);
    assert_eq!(out.clean.iter().filter(|r| r.country == "USA").count(), 3);

    let cube = &out.seasonality.records;
    let total: usize = cube.iter().map(|r| r.attack_count).sum();
    assert_eq!(total, out.clean.len());
    assert!(out.report.cube.integrity_ok);

    let summary: Vec<(&str, MonthName, TimeCategory, Fatality, usize)> = cube
        .iter()
        .map(|r| (r.country.as_str(), r.month_name, r.time_category, r.fatal, r.attack_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Australia", MonthName::December, TimeCategory::Morning, Fatality::Fatal, 2),
            ("South Africa", MonthName::December, TimeCategory::Afternoon, Fatality::NonFatal, 1),
            ("USA", MonthName::June, TimeCategory::Afternoon, Fatality::NonFatal, 2),
            ("USA", MonthName::August, TimeCategory::Afternoon, Fatality::NonFatal, 1),
        ]
    );
}

#[test]
fn test_drop_policy_removes_unknown_times() {
    let data = "Case Number,Date,Country,Fatal Y/N,Time\n\
                a,01-Jan-2000,Fiji,N,\n\
                b,01-Jan-2000,Fiji,N,09h00\n";
    let parsed = parse_raw_records(data.as_bytes());

    let retain = run_pipeline(&parsed.records, &CleaningConfig::default());
    assert_eq!(retain.clean.len(), 2);

    let config = CleaningConfig {
        unknown_time_policy: UnknownTimePolicy::Drop,
        ..Default::default()
    };
    let drop = run_pipeline(&parsed.records, &config);
    assert_eq!(drop.clean.len(), 1);
    assert_eq!(drop.report.cleaning.dropped(DropReason::Time), 1);
}

#[test]
fn test_written_tables_aggregate_identically() {
    let dir = format!("{}/shark_seasonality_it", env::temp_dir().display());
    let clean_path = format!("{dir}/shark_attacks_clean.csv");
    let cube_path = format!("{dir}/seasonality_analysis.csv");
    let _ = fs::remove_dir_all(&dir);

    let parsed = parse_raw_records(SAMPLE);
    let out = run_pipeline(&parsed.records, &CleaningConfig::default());
    write_clean_csv(&clean_path, &out.clean).unwrap();
    write_seasonality_csv(&cube_path, &out.seasonality.records).unwrap();

    let reloaded = read_clean_csv(&clean_path).unwrap();
    assert_eq!(reloaded, out.clean);
    assert_eq!(
        shark_seasonality::aggregate::build_seasonality(&reloaded),
        out.seasonality
    );

    let cube = fs::read_to_string(&cube_path).unwrap();
    let mut lines = cube.lines();
    assert_eq!(
        lines.next(),
        Some("Country,Month_name,Time_category,Fatal Y/N,Attack_Count")
    );
    assert_eq!(lines.count(), out.seasonality.records.len());

    fs::remove_dir_all(&dir).unwrap();
}
