use tb_surveillance::{DateRange, EngineConfig, SurveillanceEngine};

use crate::utils::{Row, build_batch, engine, range, scenario_rows, ymd};

fn engine_with_population(rows: &[Row], with_ltbi: bool, population: f64) -> SurveillanceEngine {
    let config = EngineConfig::default().with_reference_population(population);
    SurveillanceEngine::new(&[build_batch(rows, with_ltbi)], config).unwrap()
}

#[test]
fn test_total_cured_is_strict() {
    let engine = engine(&scenario_rows(), false);
    assert_eq!(engine.big_numbers(None).total_cured, 1);
}

#[test]
fn test_ltbi_coverage() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "30").ltbi("10", "2", "6"),
        Row::new("2024-01-20", "Cured", "New", "30").ltbi("4", "0", "3"),
        Row::new("2024-01-25", "Cured", "New", "30").ltbi("n/a", "", "unknown"),
    ];
    let engine = engine(&rows, true);
    let totals = engine.ltbi_totals(None).unwrap();
    assert_eq!(totals.contacts_under5, 14.0);
    assert_eq!(totals.positive_under5, 2.0);
    assert_eq!(totals.tpt_completed, 9.0);
    assert_eq!(totals.eligible, 12.0);
    assert_eq!(engine.big_numbers(None).ltbi_coverage_pct, 75.0);
}

#[test]
fn test_ltbi_coverage_rounds_to_one_decimal() {
    let rows = vec![Row::new("2024-01-15", "Cured", "New", "30").ltbi("3", "0", "2")];
    assert_eq!(engine(&rows, true).big_numbers(None).ltbi_coverage_pct, 66.7);
}

#[test]
fn test_ltbi_coverage_clamps_at_100() {
    let rows = vec![Row::new("2024-01-15", "Cured", "New", "30").ltbi("2", "0", "5")];
    assert_eq!(engine(&rows, true).big_numbers(None).ltbi_coverage_pct, 100.0);
}

#[test]
fn test_ltbi_coverage_zero_when_no_eligible_contacts() {
    let rows = vec![Row::new("2024-01-15", "Cured", "New", "30").ltbi("1", "3", "1")];
    let engine = engine(&rows, true);
    assert_eq!(engine.ltbi_totals(None).unwrap().eligible, 0.0);
    assert_eq!(engine.big_numbers(None).ltbi_coverage_pct, 0.0);
}

#[test]
fn test_ltbi_coverage_zero_when_columns_absent() {
    let engine = engine(&scenario_rows(), false);
    assert_eq!(engine.ltbi_totals(None), None);
    for filter in [
        None,
        Some(range(ymd(2024, 1, 1), ymd(2024, 1, 31))),
        Some(range(ymd(2024, 2, 1), ymd(2024, 2, 29))),
        Some(range(ymd(2030, 1, 1), ymd(2030, 12, 31))),
    ] {
        assert_eq!(engine.big_numbers(filter.as_ref()).ltbi_coverage_pct, 0.0);
    }
}

#[test]
fn test_incidence_short_span_uses_one_month() {
    // 21 days between first and last record, three new or relapse cases
    let engine = engine_with_population(&scenario_rows(), false, 100_000.0);
    assert_eq!(engine.big_numbers(None).yearly_incidence_per_100k, 36.0);
}

#[test]
fn test_incidence_annualizes_long_span() {
    let rows = vec![
        Row::new("2024-01-01", "Cured", "New", "30"),
        Row::new("2024-06-15", "Failed", "Transfer in", "30"),
        Row::new("2024-12-31", "Cured", "Relapse", "30"),
    ];
    // 365 days is 11.99 months, two cases over that span
    let engine = engine_with_population(&rows, false, 100_000.0);
    assert_eq!(engine.big_numbers(None).yearly_incidence_per_100k, 2.0);
}

#[test]
fn test_incidence_with_default_population() {
    let engine = engine(&scenario_rows(), false);
    // 36 yearly cases over 14.26 million people
    assert_eq!(engine.big_numbers(None).yearly_incidence_per_100k, 0.3);
}

#[test]
fn test_incidence_degenerate_cases() {
    let rows = vec![Row::new("2024-01-15", "Cured", "Transfer in", "30")];
    let engine = engine(&rows, false);
    let single_day = DateRange::single_day(ymd(2024, 1, 15));
    assert_eq!(
        engine.big_numbers(Some(&single_day)).yearly_incidence_per_100k,
        0.0
    );

    let empty = range(ymd(2020, 1, 1), ymd(2020, 12, 31));
    assert_eq!(engine.big_numbers(Some(&empty)).yearly_incidence_per_100k, 0.0);

    let no_population = engine_with_population(&scenario_rows(), false, 0.0);
    assert_eq!(no_population.big_numbers(None).yearly_incidence_per_100k, 0.0);
}

#[test]
fn test_pediatric_summary() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "5"),
        Row::new("2024-01-15", "Cured", "Transfer in", "10"),
        Row::new("2024-01-15", "Cured", "Relapse", "13"),
        Row::new("2024-01-15", "Cured", "New", "14"),
    ];
    let summary = engine(&rows, false).pediatric_summary(None);
    assert_eq!(summary.total_under14, 3);
    assert_eq!(summary.new_or_relapse_under14, 2);
    assert_eq!(summary.new_or_relapse_pct, 66.7);
}

#[test]
fn test_latest_notifications_use_their_own_latest_month() {
    let rows = vec![
        Row::new("2024-01-10", "Cured", "New", "30"),
        Row::new("2024-01-12", "Cured", "Relapse", "30"),
        Row::new("2024-01-20", "Cured", "Relapse", "30"),
        Row::new("2024-02-03", "Cured", "New", "30"),
        Row::new("2024-02-04", "Cured", "New", "30"),
        Row::new("2024-03-01", "Cured", "Transfer in", "30"),
    ];
    let engine = engine(&rows, false);
    let latest = engine.latest_notifications(None);
    assert_eq!(latest.new_cases, 2);
    assert_eq!(latest.relapse_cases, 2);

    let january = range(ymd(2024, 1, 1), ymd(2024, 1, 31));
    let latest = engine.latest_notifications(Some(&january));
    assert_eq!(latest.new_cases, 1);
    assert_eq!(latest.relapse_cases, 2);
}
