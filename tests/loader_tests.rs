use phiscore::loader::{load_batch_file, load_site_file, read_batch};
use phiscore::{EngineBuilder, Metric, PhiError};
use std::fs;
use tempfile::tempdir;

#[test]
fn site_file_feeds_the_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("site.json");
    fs::write(
        &path,
        r#"{"site": "roof", "previousScore": 40.0,
            "readings": {"co2": 400, "humidity": 50, "pressure": "n/a"}}"#,
    )
    .unwrap();

    let sites = load_site_file(&path).unwrap();
    assert_eq!(sites.len(), 1);

    let engine = EngineBuilder::new().build().unwrap();
    let composite = engine.aggregate(&sites[0].observation.samples);
    assert_eq!(composite.available_count, 2);
    assert!(composite.missing_metrics.contains(&Metric::Pressure));
    assert_eq!(composite.overall_score, 100.0);
}

#[test]
fn malformed_json_is_a_json_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"readings\": [").unwrap();
    assert!(matches!(load_site_file(&path), Err(PhiError::Json(_))));
}

#[test]
fn batch_file_with_context_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("batch.csv");
    fs::write(
        &path,
        "Site, Metric, Value, Ecosystem, Region, Previous_Score\n\
         p1, co2, 450, wetland, europe, 70\n\
         p1, light, 650, , ,\n\
         p2, ndvi, 0.6, grassland_savanna, africa,\n",
    )
    .unwrap();

    let sites = load_batch_file(&path).unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].ecosystem.as_deref(), Some("wetland"));
    assert_eq!(sites[0].region.as_deref(), Some("europe"));
    assert_eq!(sites[0].observation.previous_score, Some(70.0));
    assert_eq!(sites[0].observation.samples.len(), 2);
    assert_eq!(sites[1].observation.samples[0].metric, Metric::Ndvi);
    assert_eq!(sites[1].observation.previous_score, None);
}

#[test]
fn batch_rejects_unknown_metric_and_bad_timestamp() {
    let err = read_batch("site,metric,value\na,radon,3\n".as_bytes()).unwrap_err();
    assert!(matches!(err, PhiError::UnknownMetric(_)));

    let err = read_batch("site,metric,value,observed_at\na,co2,400,yesterday\n".as_bytes())
        .unwrap_err();
    assert!(err.to_string().contains("row 2"));
}

#[test]
fn batch_skips_rows_without_site() {
    let sites = read_batch("site,metric,value\n,co2,400\nb,co2,500\n".as_bytes()).unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].site, "b");
}
