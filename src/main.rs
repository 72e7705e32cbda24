//! CLI entry point for the shark seasonality pipeline.
//!
//! Provides subcommands for cleaning raw encounter records, aggregating a
//! clean table into seasonality counts, or running both in one pass.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shark_seasonality::aggregate::build_seasonality;
use shark_seasonality::cleaner::clean_records;
use shark_seasonality::config::{CleaningConfig, UnknownTimePolicy};
use shark_seasonality::output::{
    print_pretty, read_clean_csv, write_clean_csv, write_report_json, write_seasonality_csv,
};
use shark_seasonality::parser::read_raw_records;
use shark_seasonality::pipeline::run_pipeline;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "shark_seasonality")]
#[command(about = "Clean shark-encounter records and build seasonality counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw export and write both the clean and seasonality tables
    Run {
        /// Raw CSV export (optionally .gz)
        #[arg(value_name = "INPUT")]
        input: String,

        /// Clean table output path
        #[arg(long, default_value = "shark_attacks_clean.csv")]
        clean_output: String,

        /// Seasonality table output path
        #[arg(long, default_value = "seasonality_analysis.csv")]
        seasonality_output: String,

        /// Optional: write the run report as JSON
        #[arg(long)]
        report: Option<String>,

        #[command(flatten)]
        cleaning: CleaningArgs,
    },
    /// Clean a raw export into the clean table only
    Clean {
        /// Raw CSV export (optionally .gz)
        #[arg(value_name = "INPUT")]
        input: String,

        /// Clean table output path
        #[arg(short, long, default_value = "shark_attacks_clean.csv")]
        output: String,

        #[command(flatten)]
        cleaning: CleaningArgs,
    },
    /// Aggregate an existing clean table into seasonality counts
    Aggregate {
        /// Clean table produced by `clean` or `run`
        #[arg(value_name = "CLEAN_CSV", default_value = "shark_attacks_clean.csv")]
        input: String,

        /// Seasonality table output path
        #[arg(short, long, default_value = "seasonality_analysis.csv")]
        output: String,
    },
}

#[derive(Args)]
struct CleaningArgs {
    /// JSON file with cleaning options
    #[arg(short, long)]
    config: Option<String>,

    /// Drop records whose time of day is unknown instead of keeping them
    #[arg(long, default_value_t = false)]
    drop_unknown_time: bool,

    /// Earliest plausible year
    #[arg(long)]
    min_year: Option<i32>,

    /// Latest plausible year (defaults to the current year)
    #[arg(long)]
    max_year: Option<i32>,
}

impl CleaningArgs {
    /// Loads the config file (if any) and applies flag overrides on top.
    fn resolve(&self) -> Result<CleaningConfig> {
        let mut config = match &self.config {
            Some(path) => CleaningConfig::load(path)?,
            None => CleaningConfig::default(),
        };
        if self.drop_unknown_time {
            config.unknown_time_policy = UnknownTimePolicy::Drop;
        }
        if let Some(min_year) = self.min_year {
            config.min_year = min_year;
        }
        if let Some(max_year) = self.max_year {
            config.max_year = Some(max_year);
        }
        config.validate()?;
        Ok(config)
    }
}

const DEFAULT_LOG_FILE: &str = "logs/shark_seasonality.log";

/// Splits `LOG_FILE_PATH` into the rolling appender's directory and file
/// name prefix.
fn log_target(path: &str) -> (PathBuf, OsString) {
    let path = Path::new(path);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("shark_seasonality.log"));
    (dir, file)
}

/// Reads `var` as an env filter with `level` always enabled.
fn env_filter(var: &str, level: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(level.parse()?))
}

/// Installs a colored stderr layer (`RUST_LOG`, info and up) and a JSON
/// daily-rolling file layer (`RUST_LOG_JSON`, debug and up). The returned
/// guard flushes the file writer when dropped.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (log_dir, log_file_name) = log_target(&log_file_path);
    let (run_log, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, log_file_name));

    let console = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let run_log = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(run_log)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            clean_output,
            seasonality_output,
            report,
            cleaning,
        } => {
            let config = cleaning.resolve()?;
            let parsed = read_raw_records(&input)?;
            let out = run_pipeline(&parsed.records, &config);
            let run_report = out.report.with_input(&input, parsed.malformed_rows);

            write_clean_csv(&clean_output, &out.clean)?;
            write_seasonality_csv(&seasonality_output, &out.seasonality.records)?;

            print_pretty(&run_report);
            if let Some(path) = report {
                write_report_json(&path, &run_report)?;
            }
            if !run_report.cube.integrity_ok {
                warn!("Seasonality integrity check failed");
            }
        }
        Commands::Clean {
            input,
            output,
            cleaning,
        } => {
            let config = cleaning.resolve()?;
            let parsed = read_raw_records(&input)?;
            let cleaned = clean_records(&parsed.records, &config);

            write_clean_csv(&output, &cleaned.records)?;

            info!(
                malformed_rows = parsed.malformed_rows,
                dropped_by_reason = ?cleaned.stats.dropped_by_reason,
                "Clean summary"
            );
        }
        Commands::Aggregate { input, output } => {
            let rows = read_clean_csv(&input)?;
            let seasonality = build_seasonality(&rows);

            write_seasonality_csv(&output, &seasonality.records)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_splits_dir_and_file() {
        assert_eq!(
            log_target("logs/run.log"),
            (PathBuf::from("logs"), OsString::from("run.log"))
        );
        assert_eq!(log_target("run.log"), (PathBuf::from("."), OsString::from("run.log")));
    }
}
