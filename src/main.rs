use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use serde::Serialize;

use tb_surveillance::algorithm::{
    CaseTypeCategory, DateRange, Distribution, Granularity, LatestNotifications, LtbiTotals,
    OutcomeCategory, PediatricSummary, PeriodAggregate, RiskCategory,
};
use tb_surveillance::utils::{create_spinner, finish_progress_bar};
use tb_surveillance::{
    EngineConfig, IngestReport, OutcomeDefinition, PatientRecord, Scorecard, SurveillanceEngine,
    TextEncoding, read_table,
};

#[derive(Debug, Parser)]
#[command(
    name = "tb-metrics",
    version,
    about = "Compute TB surveillance indicators from a CSV or Parquet export"
)]
struct Cli {
    /// Input file (.csv or .parquet)
    input: PathBuf,

    #[arg(long, help = "JSON engine configuration; missing fields use defaults")]
    config: Option<PathBuf>,

    #[arg(long, help = "First enrollment date included (YYYY-MM-DD)")]
    start: Option<NaiveDate>,

    #[arg(long, help = "Last enrollment date included (YYYY-MM-DD)")]
    end: Option<NaiveDate>,

    #[arg(long, default_value_t = Granularity::Monthly, help = "monthly or quarterly")]
    granularity: Granularity,

    #[arg(long, default_value_t = OutcomeDefinition::CuredOrCompleted, help = "cured-only or cured-or-completed")]
    outcome: OutcomeDefinition,

    #[arg(long, default_value_t = TextEncoding::Auto, help = "CSV encoding: utf-8, latin-1 or auto")]
    encoding: TextEncoding,

    #[arg(long, help = "Override the reference population")]
    population: Option<f64>,

    #[arg(long, default_value_t = false, help = "Include the filtered records in the output")]
    records: bool,

    #[arg(long, default_value_t = false, help = "Pretty-print the JSON output")]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    ingest: &'a IngestReport,
    filter: Option<DateRange>,
    date_bounds: Option<(NaiveDate, NaiveDate)>,
    scorecard: Scorecard,
    ltbi_totals: Option<LtbiTotals>,
    pediatric: PediatricSummary,
    latest_notifications: LatestNotifications,
    treatment_outcome_distribution: Distribution<OutcomeCategory>,
    high_risk_distribution: Distribution<RiskCategory>,
    under14_distribution: Distribution<CaseTypeCategory>,
    series: Vec<PeriodAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<&'a PatientRecord>>,
}

/// Resolve an open-ended range against the dataset bounds
fn resolve_filter(
    engine: &SurveillanceEngine,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<DateRange> {
    if start.is_none() && end.is_none() {
        return None;
    }
    let (first, last) = engine.date_bounds(None)?;
    Some(DateRange::new(start.unwrap_or(first), end.unwrap_or(last)))
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(population) = cli.population {
        config = config.with_reference_population(population);
    }
    if let (Some(start), Some(end)) = (cli.start, cli.end) {
        if start > end {
            warn!("--start {start} is after --end {end}; no records will match");
        }
    }

    let message = format!("Reading {}", cli.input.display());
    let spinner = create_spinner(Some(message.as_str()));
    let batches = read_table(&cli.input, cli.encoding)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    finish_progress_bar(&spinner, Some("Input loaded"));

    let engine = SurveillanceEngine::new(&batches, config)
        .with_context(|| format!("Failed to build engine from {}", cli.input.display()))?;
    info!("{}", engine.config());

    let filter = resolve_filter(&engine, cli.start, cli.end);
    let filter_ref = filter.as_ref();
    let view = engine.apply_date_filter(filter_ref);
    info!("Computing indicators over {} records", view.len());

    let report = Report {
        ingest: engine.ingest_report(),
        filter,
        date_bounds: view.date_bounds(),
        scorecard: engine.scorecard(filter_ref),
        ltbi_totals: engine.ltbi_totals(filter_ref),
        pediatric: engine.pediatric_summary(filter_ref),
        latest_notifications: engine.latest_notifications(filter_ref),
        treatment_outcome_distribution: engine
            .treatment_outcome_distribution(filter_ref, cli.outcome),
        high_risk_distribution: engine.high_risk_distribution(filter_ref),
        under14_distribution: engine.under14_distribution(filter_ref),
        series: engine.period_aggregates(filter_ref, cli.granularity, cli.outcome),
        records: cli.records.then(|| view.records().to_vec()),
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}
