use chrono::Utc;
use phiscore::config::{TuningParams, MAX_WINDOW_MINS};
use phiscore::tables::normalize_key;
use phiscore::{
    EngineBuilder, Metric, MetricSample, PhiError, ReferenceTables, SiteRequest, WeightProfile,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_tables_round_trip_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tables.json");
    let tables = ReferenceTables::default();
    fs::write(&path, serde_json::to_string_pretty(&tables).unwrap()).unwrap();

    let loaded = ReferenceTables::load_from_file(&path).unwrap();
    assert_eq!(loaded, tables);
}

#[test]
fn tables_file_overrides_only_what_it_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tables.json");
    fs::write(
        &path,
        r#"{
            "weights": {"sensor": {"co2": 1.0}},
            "ecosystems": {
                "default": {"baseline_per_hectare": 1000.0, "services": {"recreation": 1000.0}},
                "peat_bog": {"baseline_per_hectare": 2000.0, "services": {"carbon_sequestration": 2000.0}}
            }
        }"#,
    )
    .unwrap();

    let engine = EngineBuilder::new()
        .with_tables_from_file(&path)
        .unwrap()
        .build()
        .unwrap();
    let composite = engine.aggregate(&[
        MetricSample::new(Metric::Co2, 1000.0),
        MetricSample::new(Metric::Temperature, 40.0),
    ]);
    assert_eq!(composite.total_count, 1);
    assert_eq!(composite.overall_score, 80.0);

    let esv = engine.valuate(50.0, Some("Peat Bog"), Some("north_america"));
    assert_eq!(esv.ecosystem_type, "peat_bog");
    assert_eq!(esv.adjusted_value, 2000.0);
    // A named section replaces the whole table; unnamed ones keep defaults
    assert!(engine
        .tables()
        .profile_weights(WeightProfile::RemoteSensing)
        .is_err());
    assert_eq!(engine.tables().regions, ReferenceTables::default().regions);
}

#[test]
fn invalid_tables_are_rejected_at_build() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tables.json");
    fs::write(
        &path,
        r##"{"grades": [{"min_score": 50.0, "grade": "P", "label": "Pass", "color": "#000000"},
                        {"min_score": 60.0, "grade": "X", "label": "Top", "color": "#ffffff"}]}"##,
    )
    .unwrap();
    let err = ReferenceTables::load_from_file(&path).unwrap_err();
    assert!(matches!(err, PhiError::Config(_)), "{}", err);
}

#[test]
fn ecosystem_table_needs_a_default() {
    let mut tables = ReferenceTables::default();
    tables.ecosystems.remove("default");
    assert!(EngineBuilder::new().with_tables(tables).build().is_err());
}

#[test]
fn missing_tables_file_is_an_io_error() {
    let err = ReferenceTables::load_from_file("/nonexistent/tables.json").unwrap_err();
    assert!(matches!(err, PhiError::Io(_)));
}

#[test]
fn tuning_file_with_partial_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tuning.json");
    fs::write(&path, r#"{"multiplier_k": 0.8, "trend_tolerance": 5.0}"#).unwrap();

    let tuning = TuningParams::load_from_file(&path).unwrap();
    assert_eq!(tuning.multiplier_k, 0.8);
    assert_eq!(tuning.trend_tolerance, 5.0);
    assert_eq!(tuning.multiplier_alpha, 0.15);
    assert_eq!(tuning.fresh_window_mins, 5);

    let engine = EngineBuilder::new().with_tuning(tuning).build().unwrap();
    // ((100 - 50) / 100) * 0.8 * (1 + 0.15 ln 2)
    assert_eq!(engine.multiplier(100.0), 0.4416);
}

#[test]
fn tuning_windows_must_be_ordered() {
    let tuning = TuningParams {
        fresh_window_mins: 30,
        stale_window_mins: 10,
        ..Default::default()
    };
    assert!(tuning.validate().is_err());
    assert!(EngineBuilder::new().with_tuning(tuning).build().is_err());
}

#[test]
fn oversized_window_is_a_config_error() {
    let tuning = TuningParams {
        stale_window_mins: i64::MAX,
        ..Default::default()
    };
    let err = EngineBuilder::new().with_tuning(tuning).build().unwrap_err();
    assert!(matches!(err, PhiError::Config(_)), "{}", err);

    let dir = tempdir().unwrap();
    let path = dir.path().join("tuning.json");
    fs::write(&path, r#"{"stale_window_mins": 9223372036854775807}"#).unwrap();
    assert!(matches!(
        TuningParams::load_from_file(&path),
        Err(PhiError::Config(_))
    ));
}

#[test]
fn one_year_window_still_scores() {
    let tuning = TuningParams {
        stale_window_mins: MAX_WINDOW_MINS,
        ..Default::default()
    };
    let engine = EngineBuilder::new().with_tuning(tuning).build().unwrap();
    let site = SiteRequest::new("old", vec![MetricSample::new(Metric::Co2, 400.0)]);
    let assessment = engine.evaluate(&site, Utc::now());
    assert_eq!(assessment.composite.overall_score, 100.0);
}

#[test]
fn region_keys_must_be_snake_case() {
    let mut tables = ReferenceTables::default();
    tables
        .regions
        .factors
        .insert("North America".to_string(), 1.0);
    let err = tables.validate().unwrap_err();
    assert!(err.to_string().contains("snake_case"));
    assert_eq!(normalize_key("North America"), "north_america");
}
