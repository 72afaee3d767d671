use tb_surveillance::{Granularity, OutcomeDefinition, PeriodKey, RiskFactor, SeriesMetric};

use crate::utils::{Row, engine, range, scenario_rows, ymd};

#[test]
fn test_monthly_series_of_scenario() {
    let engine = engine(&scenario_rows(), false);
    let rows = engine.period_series(
        None,
        Granularity::Monthly,
        OutcomeDefinition::CuredOrCompleted,
        &[SeriesMetric::Diagnosed, SeriesMetric::Successful],
    );

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].period, PeriodKey::Month(2024, 1));
    assert_eq!(rows[0].period_start, ymd(2024, 1, 1));
    assert_eq!(rows[0].values[&SeriesMetric::Diagnosed], 2.0);
    assert_eq!(rows[0].values[&SeriesMetric::Successful], 1.0);
    assert_eq!(rows[1].period, PeriodKey::Month(2024, 2));
    assert_eq!(rows[1].values[&SeriesMetric::Diagnosed], 1.0);
    assert_eq!(rows[1].values[&SeriesMetric::Successful], 1.0);
    assert!(!rows[0].values.contains_key(&SeriesMetric::HighRisk));
}

#[test]
fn test_cured_only_series() {
    let engine = engine(&scenario_rows(), false);
    let aggregates = engine.period_aggregates(None, Granularity::Monthly, OutcomeDefinition::CuredOnly);
    assert_eq!(aggregates[0].successful, 1);
    assert_eq!(aggregates[1].successful, 0);
}

#[test]
fn test_quarterly_series() {
    let mut rows = scenario_rows();
    rows.push(Row::new("2024-04-01", "Cured", "New", "30"));
    let engine = engine(&rows, false);
    let aggregates =
        engine.period_aggregates(None, Granularity::Quarterly, OutcomeDefinition::CuredOrCompleted);

    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[0].period, PeriodKey::Quarter(2024, 1));
    assert_eq!(aggregates[0].diagnosed, 3);
    assert_eq!(aggregates[0].successful, 2);
    assert_eq!(aggregates[0].new_cases, 2);
    assert_eq!(aggregates[0].relapse_cases, 1);
    assert_eq!(aggregates[1].period, PeriodKey::Quarter(2024, 2));
    assert_eq!(aggregates[1].period_start, ymd(2024, 4, 1));
}

#[test]
fn test_series_skips_empty_periods_and_sorts() {
    let rows = vec![
        Row::new("2024-05-02", "Cured", "New", "30"),
        Row::new("2023-11-30", "Cured", "New", "30"),
        Row::new("2024-01-15", "Cured", "New", "30"),
    ];
    let aggregates = engine(&rows, false).period_aggregates(
        None,
        Granularity::Monthly,
        OutcomeDefinition::CuredOrCompleted,
    );
    let periods = aggregates.iter().map(|a| a.period.to_string()).collect::<Vec<_>>();
    assert_eq!(periods, vec!["2023-11", "2024-01", "2024-05"]);
}

#[test]
fn test_high_risk_and_rates() {
    let rows = vec![
        Row::new("2024-01-05", "Cured", "New", "30").risk(RiskFactor::Diabetic, "yes"),
        Row::new("2024-01-06", "Cured", "New", "30"),
        Row::new("2024-01-07", "Cured", "Relapse", "80"),
    ];
    let engine = engine(&rows, false);
    let aggregates = engine.period_aggregates(None, Granularity::Monthly, OutcomeDefinition::CuredOnly);
    let january = &aggregates[0];

    assert_eq!(january.high_risk, 2);
    let population = engine.config().reference_population;
    assert_eq!(january.new_rate_per_100k, 2.0 / population * 100_000.0);
    assert_eq!(january.relapse_rate_per_100k, 1.0 / population * 100_000.0);
}

#[test]
fn test_series_respects_filter() {
    let engine = engine(&scenario_rows(), false);
    let february = range(ymd(2024, 2, 1), ymd(2024, 2, 29));
    let rows = engine.period_series(
        Some(&february),
        Granularity::Monthly,
        OutcomeDefinition::CuredOrCompleted,
        &SeriesMetric::ALL,
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values.len(), SeriesMetric::ALL.len());
    assert_eq!(rows[0].values[&SeriesMetric::NewCases], 1.0);
}
