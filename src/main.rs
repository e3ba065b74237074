//! Gravida: Obstetric clinical-calculation and risk/alerting engine.
//!
//! CLI wrapper around the engine: reads an episode snapshot (episode plus
//! chronologically ordered readings) as JSON, runs every engine operation,
//! and prints a JSON report.
//!
//! ```bash
//! gravida <snapshot.json> [--as-of YYYY-MM-DD]
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use gravida::adapters::log::LogNotifier;
use gravida::adapters::memory::MemoryStore;
use gravida::application::{GestationalStatus, PrenatalService};
use gravida::domain::{Alert, PregnancyEpisode, RiskAssessment, TrendSummary, VisitReading};

/// Input snapshot: one episode and its visit history.
#[derive(Debug, Deserialize)]
struct Snapshot {
    episode: PregnancyEpisode,
    #[serde(default)]
    readings: Vec<VisitReading>,
}

/// Report over the latest reading and the full history.
#[derive(Debug, Serialize)]
struct Report {
    gestational_status: GestationalStatus,
    risk_assessment: RiskAssessment,
    /// Alerts for the most recent reading; empty when there are no readings.
    alerts: Vec<Alert>,
    trends: TrendSummary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut snapshot_path: Option<std::path::PathBuf> = None;
    let mut as_of: Option<NaiveDate> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--as-of" => {
                let value = args.next().context("--as-of requires a date (YYYY-MM-DD)")?;
                as_of = Some(value.parse().context("invalid --as-of date")?);
            }
            "--help" | "-h" => {
                eprintln!("Usage: gravida <snapshot.json> [--as-of YYYY-MM-DD]");
                return Ok(());
            }
            path if snapshot_path.is_none() => snapshot_path = Some(path.into()),
            other => bail!("unexpected argument: {other}"),
        }
    }

    let snapshot_path = snapshot_path.context("missing snapshot path (see --help)")?;
    let raw = std::fs::read_to_string(&snapshot_path)
        .with_context(|| format!("reading {}", snapshot_path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw).context("parsing snapshot JSON")?;

    if let Err(errors) = snapshot.episode.validate() {
        bail!("invalid episode: {}", errors.join("; "));
    }

    let episode_id = snapshot.episode.id.clone();
    let latest_visit = snapshot.readings.iter().map(|r| r.visit_date).max();
    let as_of = as_of
        .or(latest_visit)
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let store = Arc::new(
        MemoryStore::with_snapshot(snapshot.episode, snapshot.readings)
            .context("loading snapshot into store")?,
    );
    let service = PrenatalService::new(store, LogNotifier::new());

    let report = Report {
        gestational_status: service.gestational_status(&episode_id, as_of)?,
        risk_assessment: service.assess_risk(&episode_id)?,
        alerts: match latest_visit {
            Some(visit_date) => service.evaluate_visit(&episode_id, visit_date)?,
            None => Vec::new(),
        },
        trends: service.trends(&episode_id, None)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
