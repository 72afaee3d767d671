use std::sync::Arc;

use arrow::array::{ArrayRef, Date32Array, Int64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use tb_surveillance::models::{TreatmentHistory, TreatmentOutcome};
use tb_surveillance::{
    EngineConfig, RiskFactor, SurveillanceDataset, SurveillanceEngine, SurveillanceError,
};

use crate::utils::{Row, batch_from_columns, build_batch, engine, scenario_rows, ymd};

#[test]
fn test_unparseable_dates_are_dropped() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "30"),
        Row::new("not a date", "Cured", "New", "30"),
        Row::new("", "Cured", "New", "30"),
        Row::new("15/02/2024", "Failed", "Relapse", "40"),
    ];
    let engine = engine(&rows, true);

    let report = engine.ingest_report();
    assert_eq!(report.rows_read, 4);
    assert_eq!(report.rows_kept, 2);
    assert_eq!(report.rows_dropped, 2);
    assert_eq!(engine.dataset().len(), 2);

    let dates = engine
        .dataset()
        .iter()
        .map(|r| r.enrollment_date)
        .collect::<Vec<_>>();
    assert_eq!(dates, vec![ymd(2024, 1, 15), ymd(2024, 2, 15)]);
}

#[test]
fn test_classification_is_case_and_whitespace_insensitive() {
    let rows = vec![
        Row::new("2024-01-15", "  CURED ", " new", "30"),
        Row::new("2024-01-16", "Completed", "RELAPSE ", "30"),
        Row::new("2024-01-17", "Treatment completed", "Transfer in", "30"),
    ];
    let engine = engine(&rows, false);
    let records = engine.dataset().records();

    assert_eq!(records[0].treatment_outcome, TreatmentOutcome::Cured);
    assert_eq!(records[0].treatment_history, TreatmentHistory::New);
    assert_eq!(records[1].treatment_outcome, TreatmentOutcome::Completed);
    assert_eq!(records[1].treatment_history, TreatmentHistory::Relapse);
    assert_eq!(records[2].treatment_outcome, TreatmentOutcome::Other);
    assert_eq!(records[2].treatment_history, TreatmentHistory::Other);
    assert_eq!(records[2].treatment_outcome_raw, "Treatment completed");
}

#[test]
fn test_missing_required_column_is_fatal() {
    let batch = batch_from_columns(&[
        ("Enrollment date(Diagnostic Date)", vec![Some("2024-01-15")]),
        ("Previous treatment history", vec![Some("New")]),
    ]);
    let err = SurveillanceEngine::new(&[batch], EngineConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SurveillanceError::MissingColumn { ref column } if column == "Treatment outcome"
    ));
}

#[test]
fn test_missing_optional_columns_default_to_false() {
    let batch = batch_from_columns(&[
        (
            "Enrollment date(Diagnostic Date)",
            vec![Some("2024-01-15"), Some("2024-01-16")],
        ),
        ("Treatment outcome", vec![Some("Cured"), Some("Failed")]),
        ("TB_Current age", vec![Some("70"), Some("30")]),
    ]);
    let engine = SurveillanceEngine::new(&[batch], EngineConfig::default()).unwrap();
    let records = engine.dataset().records();

    assert!(!records[0].risk.any());
    assert!(records[0].is_high_risk());
    assert!(!records[1].is_high_risk());
    assert_eq!(records[0].treatment_history, TreatmentHistory::Other);
    assert!(!engine.dataset().ltbi_available());

    let missing = &engine.ingest_report().missing_optional_columns;
    assert!(missing.contains(&"Prisoners".to_string()));
    assert!(missing.contains(&"Previous treatment history".to_string()));
    assert!(!missing.contains(&"TB_Current age".to_string()));
}

#[test]
fn test_risk_indicators() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "30").risk(RiskFactor::Prisoner, "Yes"),
        Row::new("2024-01-15", "Cured", "New", "30").risk(RiskFactor::HivPositive, " positive "),
        Row::new("2024-01-15", "Cured", "New", "30").risk(RiskFactor::HivPositive, "yes"),
        Row::new("2024-01-15", "Cured", "New", "30").risk(RiskFactor::Refugee, "YES"),
        Row::new("2024-01-15", "Cured", "New", "30").risk(RiskFactor::Diabetic, "No"),
    ];
    let engine = engine(&rows, false);
    let high_risk = engine
        .dataset()
        .iter()
        .map(|r| r.is_high_risk())
        .collect::<Vec<_>>();
    assert_eq!(high_risk, vec![true, true, false, true, false]);
    assert!(engine.dataset().records()[3].risk.is_set(RiskFactor::Refugee));
}

#[test]
fn test_age_thresholds_are_independent() {
    let rows = vec![
        Row::new("2024-01-15", "Cured", "New", "13.9"),
        Row::new("2024-01-15", "Cured", "New", "14"),
        Row::new("2024-01-15", "Cured", "New", "15"),
        Row::new("2024-01-15", "Cured", "New", "65"),
        Row::new("2024-01-15", "Cured", "New", "65.5"),
        Row::new("2024-01-15", "Cured", "New", "unknown"),
    ];
    let engine = engine(&rows, false);
    let flags = engine
        .dataset()
        .iter()
        .map(|r| (r.is_under_14, r.is_under_15, r.is_above_65))
        .collect::<Vec<_>>();
    assert_eq!(
        flags,
        vec![
            (true, true, false),
            (false, true, false),
            (false, false, false),
            (false, false, false),
            (false, false, true),
            (false, false, false),
        ]
    );
    assert!(!engine.dataset().records()[5].is_high_risk());
}

#[test]
fn test_batches_keep_input_order() {
    let rows = scenario_rows();
    let single = engine(&rows, true);

    let batches = rows
        .iter()
        .map(|r| build_batch(std::slice::from_ref(r), true))
        .collect::<Vec<_>>();
    let split = SurveillanceEngine::new(&batches, EngineConfig::default()).unwrap();

    assert_eq!(single.dataset().records(), split.dataset().records());
    assert_eq!(split.ingest_report().rows_read, 3);
}

#[test]
fn test_ltbi_available_when_any_batch_has_columns() {
    let with_ltbi =
        build_batch(&[Row::new("2024-01-15", "Cured", "New", "3").ltbi("4", "1", "3")], true);
    let without_ltbi = build_batch(&[Row::new("2024-02-15", "Cured", "New", "3")], false);
    let engine =
        SurveillanceEngine::new(&[with_ltbi, without_ltbi], EngineConfig::default()).unwrap();

    assert!(engine.dataset().ltbi_available());
    let totals = engine.ltbi_totals(None).unwrap();
    assert_eq!(totals.contacts_under5, 4.0);
    assert_eq!(totals.eligible, 3.0);
    assert_eq!(engine.big_numbers(None).ltbi_coverage_pct, 100.0);
}

#[test]
fn test_native_arrow_types_are_accepted() {
    let schema = Schema::new(vec![
        Field::new("Enrollment date(Diagnostic Date)", DataType::Date32, true),
        Field::new("Treatment outcome", DataType::Utf8, true),
        Field::new("TB_Current age", DataType::Int64, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            // 2024-01-15 and 2024-02-05
            Arc::new(Date32Array::from(vec![Some(19_737), Some(19_758), None])) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("Cured"), Some("Failed"), Some("Cured")])),
            Arc::new(Int64Array::from(vec![Some(10), Some(70), Some(30)])),
        ],
    )
    .unwrap();

    let dataset = SurveillanceDataset::normalize(&[batch], &EngineConfig::default()).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.report().rows_dropped, 1);
    assert_eq!(dataset.records()[0].enrollment_date, ymd(2024, 1, 15));
    assert_eq!(dataset.records()[1].enrollment_date, ymd(2024, 2, 5));
    assert!(dataset.records()[0].is_under_14);
    assert!(dataset.records()[1].is_above_65);
}

#[test]
fn test_timezone_aware_timestamps_are_accepted() {
    let schema = Schema::new(vec![
        Field::new(
            "Enrollment date(Diagnostic Date)",
            DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
            true,
        ),
        Field::new("Treatment outcome", DataType::Utf8, true),
    ]);
    let dates = TimestampSecondArray::from(vec![Some(1_705_276_800), Some(1_707_091_200)])
        .with_timezone("UTC");
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            // 2024-01-15 and 2024-02-05 at midnight UTC
            Arc::new(dates) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("Cured"), Some("Failed")])),
        ],
    )
    .unwrap();

    let dataset = SurveillanceDataset::normalize(&[batch], &EngineConfig::default()).unwrap();
    assert_eq!(dataset.report().rows_dropped, 0);
    assert_eq!(dataset.records()[0].enrollment_date, ymd(2024, 1, 15));
    assert_eq!(dataset.records()[1].enrollment_date, ymd(2024, 2, 5));
}

#[test]
fn test_custom_column_names() {
    let mut config = EngineConfig::default();
    config.columns.enrollment_date = "diagnosis_date".to_string();
    config.columns.treatment_outcome = "outcome".to_string();

    let batch = batch_from_columns(&[
        ("diagnosis_date", vec![Some("2024-03-01")]),
        ("outcome", vec![Some("cured")]),
    ]);
    let engine = SurveillanceEngine::new(&[batch], config).unwrap();
    assert_eq!(engine.big_numbers(None).total_cured, 1);
}
