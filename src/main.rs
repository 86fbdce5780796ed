//! CLI entry point for the fleet report tool.
//!
//! Provides subcommands for running one of the eleven fleet reports over a
//! date window and for listing devices, rules, and report keys.

mod infra;
mod services;

use crate::infra::telematics::TelematicsClient;
use crate::services::fleet_api::{DEFAULT_RESULTS_LIMIT, FleetApi, fetch_inputs};
use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use fleet_reporter::fetch::BasicClient;
use fleet_reporter::output::{print_json, write_chart, write_csv, write_table};
use fleet_reporter::reports::dispatch::{ReportKind, run_report};
use fleet_reporter::session::{DEFAULT_BASE_URL, SessionContext, authenticate};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_reporter")]
#[command(about = "Fleet telemetry reports over the vendor JSON-RPC API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one report over a date window
    Report {
        /// Report to run (e.g. speeding, distance, safety_scorecard)
        #[arg(value_enum)]
        report: ReportKind,

        /// First day of the window (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// CSV file to export the table to
        #[arg(short, long)]
        output: Option<String>,

        /// Emit the report as JSON instead of table + chart
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the available report keys
    ListReports,
    /// List devices visible to the authenticated account
    ListDevices {
        #[arg(short, long, default_value_t = DEFAULT_RESULTS_LIMIT)]
        limit: u32,
    },
    /// List exception rules, for checking what the keyword matching sees
    ListRules {
        #[arg(short, long, default_value_t = DEFAULT_RESULTS_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_reporter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_reporter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            report,
            from,
            to,
            output,
            json,
        } => {
            let (from_dt, to_dt) = resolve_window(from, to);
            info!(
                report = report.key(),
                from = %from_dt,
                to = %to_dt,
                "Running report"
            );

            let api = login().await?;
            let inputs = fetch_inputs(&api, report, from_dt, to_dt).await?;
            let result = run_report(report, &inputs);

            info!(rows = result.rows.len(), "Report complete");

            if json {
                print_json(&result)?;
            } else {
                let mut stdout = std::io::stdout();
                write_table(&mut stdout, report.title(), &result)?;
                println!();
                write_chart(&mut stdout, &result.chart)?;
            }

            if let Some(path) = output {
                write_csv(&path, &result)?;
                info!(%path, "Report exported");
            }
        }
        Commands::ListReports => {
            for kind in ReportKind::ALL {
                println!("{:<20} {}", kind.key(), kind.title());
            }
        }
        Commands::ListDevices { limit } => {
            let api = login().await?;
            let devices = api.list_devices(limit).await?;

            info!(total = devices.len(), "Device list fetched");
            for device in &devices {
                info!(
                    device_id = %device.id,
                    name = device.name.as_deref().unwrap_or(""),
                    serial_number = device.serial_number.as_deref().unwrap_or(""),
                    "Device"
                );
            }
        }
        Commands::ListRules { limit } => {
            let api = login().await?;
            let rules = api.list_rules(limit).await?;

            info!(total = rules.len(), "Rule list fetched");
            for rule in &rules {
                info!(
                    rule_id = %rule.id,
                    name = rule.name.as_deref().unwrap_or(""),
                    "Rule"
                );
            }
        }
    }

    Ok(())
}

/// Authenticates with credentials from the environment and wraps the session
/// in the vendor client.
async fn login() -> Result<TelematicsClient> {
    let user_name = require_env("FLEET_USERNAME")?;
    let password = require_env("FLEET_PASSWORD")?;
    let database = require_env("FLEET_DATABASE")?;
    let base_url =
        std::env::var("FLEET_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let http = BasicClient::new();
    let ctx: SessionContext =
        authenticate(&http, &base_url, &user_name, &password, &database).await?;

    Ok(TelematicsClient::new(http, ctx))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("{key} must be set"))
}

/// Expands the date window to inclusive UTC timestamps; the default window is
/// the previous calendar month.
fn resolve_window(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Utc::now().date_naive();
    let last_of_prev_month = today
        .with_day(1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    let first_of_prev_month = last_of_prev_month.with_day(1).unwrap_or(last_of_prev_month);

    let from = from.unwrap_or(first_of_prev_month);
    let to = to.unwrap_or(last_of_prev_month);

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    (
        from.and_time(NaiveTime::MIN).and_utc(),
        to.and_time(end_of_day).and_utc(),
    )
}
