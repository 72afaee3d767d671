use tb_surveillance::{CaseTypeCategory, OutcomeCategory, OutcomeDefinition, RiskCategory, RiskFactor};

use crate::utils::{Row, engine, range, scenario_rows, ymd};

#[test]
fn test_outcome_distribution_uses_latest_month_only() {
    let engine = engine(&scenario_rows(), false);

    let cured_only = engine.treatment_outcome_distribution(None, OutcomeDefinition::CuredOnly);
    assert_eq!(cured_only.len(), 1);
    assert_eq!(cured_only[&OutcomeCategory::Others], 1);

    let with_completed =
        engine.treatment_outcome_distribution(None, OutcomeDefinition::CuredOrCompleted);
    assert_eq!(with_completed.len(), 1);
    assert_eq!(with_completed[&OutcomeCategory::CuredOrCompleted], 1);
}

#[test]
fn test_outcome_distribution_follows_filter() {
    let engine = engine(&scenario_rows(), false);
    let january = range(ymd(2024, 1, 1), ymd(2024, 1, 31));

    let counts = engine.treatment_outcome_distribution(Some(&january), OutcomeDefinition::CuredOnly);
    assert_eq!(counts[&OutcomeCategory::Cured], 1);
    assert_eq!(counts[&OutcomeCategory::Others], 1);
    assert!(!counts.contains_key(&OutcomeCategory::CuredOrCompleted));
}

#[test]
fn test_high_risk_distribution() {
    let rows = vec![
        Row::new("2024-01-05", "Cured", "New", "30").risk(RiskFactor::Prisoner, "yes"),
        Row::new("2024-02-05", "Cured", "New", "8"),
        Row::new("2024-02-06", "Cured", "New", "70"),
        Row::new("2024-02-07", "Cured", "New", "40").risk(RiskFactor::MiningWorker, "Yes"),
        Row::new("2024-02-08", "Cured", "New", "40"),
    ];
    let counts = engine(&rows, false).high_risk_distribution(None);
    assert_eq!(counts[&RiskCategory::HighRisk], 3);
    assert_eq!(counts[&RiskCategory::Others], 1);
}

#[test]
fn test_distributions_empty_after_filtering_everything_out() {
    let engine = engine(&scenario_rows(), false);
    let nothing = range(ymd(2023, 1, 1), ymd(2023, 12, 31));

    assert!(engine.high_risk_distribution(Some(&nothing)).is_empty());
    assert!(
        engine
            .treatment_outcome_distribution(Some(&nothing), OutcomeDefinition::CuredOrCompleted)
            .is_empty()
    );
    assert!(engine.under14_distribution(Some(&nothing)).is_empty());
}

#[test]
fn test_inverted_range_selects_nothing() {
    let engine = engine(&scenario_rows(), false);
    let inverted = range(ymd(2024, 2, 28), ymd(2024, 1, 1));
    assert!(engine.apply_date_filter(Some(&inverted)).is_empty());
    assert!(engine.high_risk_distribution(Some(&inverted)).is_empty());
}

#[test]
fn test_under14_distribution() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "5"),
        Row::new("2024-02-15", "Cured", "Transfer in", "10"),
        Row::new("2024-03-15", "Cured", "Relapse", "13"),
        Row::new("2024-03-15", "Cured", "New", "40"),
    ];
    let counts = engine(&rows, false).under14_distribution(None);
    assert_eq!(counts[&CaseTypeCategory::NewOrRelapse], 2);
    assert_eq!(counts[&CaseTypeCategory::Other], 1);
}

#[test]
fn test_under14_distribution_keeps_zero_category() {
    let rows = vec![Row::new("2024-01-15", "Cured", "New", "5")];
    let counts = engine(&rows, false).under14_distribution(None);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&CaseTypeCategory::Other], 0);
}

#[test]
fn test_under14_distribution_empty_without_children() {
    let counts = engine(&scenario_rows(), false).under14_distribution(None);
    assert!(counts.is_empty());
}
