use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use phiscore::narrator::{ImpactCategory, Severity};
use phiscore::scorer::{Freshness, Trend};
use phiscore::{Engine, EngineBuilder, Metric, MetricSample, SiteRequest, WeightProfile};

fn engine() -> Engine {
    EngineBuilder::new().build().unwrap()
}

fn site(name: &str, co2: f64) -> SiteRequest {
    SiteRequest::new(
        name,
        vec![
            MetricSample::new(Metric::Co2, co2),
            MetricSample::new(Metric::Temperature, 22.0),
            MetricSample::new(Metric::Humidity, 50.0),
            MetricSample::new(Metric::Light, 500.0),
            MetricSample::new(Metric::Pressure, 1013.25),
        ],
    )
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}

#[test]
fn full_pipeline_flows_score_into_value() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let mut req = site("plot-1", 400.0).ecosystem("wetland").region("europe");
    req.observation.observed_at = Some(now - Duration::minutes(1));
    req.observation.previous_score = Some(99.0);

    let a = engine().evaluate(&req, now);
    assert_eq!(a.site, "plot-1");
    assert_abs_diff_eq!(a.composite.overall_score, 100.0, epsilon = 1e-9);
    assert_eq!(a.composite.data_freshness, Freshness::Fresh);
    assert_eq!(a.composite.trend, Trend::Stable);

    assert_eq!(a.esv.ecosystem_type, "wetland");
    assert_eq!(a.esv.phi_multiplier, 0.3312);
    assert_abs_diff_eq!(
        a.projections.moderate.at_year(0).unwrap().esv,
        a.esv.adjusted_value,
        epsilon = 1e-9
    );

    let categories: Vec<ImpactCategory> = a.impacts.iter().map(|i| i.category).collect();
    assert_eq!(
        categories,
        vec![
            ImpactCategory::Health,
            ImpactCategory::Economic,
            ImpactCategory::Biodiversity
        ]
    );
    assert!(a.impacts.iter().all(|i| i.severity == Severity::Excellent));
}

#[test]
fn empty_site_is_still_assessed() {
    let now = Utc::now();
    let req = SiteRequest::new("dark", vec![MetricSample::missing(Metric::Co2)]);
    let a = engine().evaluate(&req, now);
    assert!(a.composite.is_empty());
    assert_eq!(a.esv.phi_multiplier, -0.30);
    assert_eq!(a.esv.ecosystem_type, "default");
    assert!(a.impacts.iter().all(|i| i.severity == Severity::Critical));
}

#[test]
fn batch_keeps_input_order_and_matches_sequential() {
    let engine = engine();
    let now = Utc::now();
    let requests: Vec<SiteRequest> = (0..64)
        .map(|i| site(&format!("s{}", i), 400.0 + 30.0 * i as f64))
        .collect();

    let batch = engine.evaluate_batch(&requests, now);
    assert_eq!(batch.len(), requests.len());
    for (req, got) in requests.iter().zip(&batch) {
        assert_eq!(got.site, req.site);
        assert_eq!(*got, engine.evaluate(req, now));
    }
}

#[test]
fn profile_selects_weights() {
    let engine = EngineBuilder::new()
        .with_profile(WeightProfile::RemoteSensing)
        .build()
        .unwrap();
    let composite = engine.aggregate(&[MetricSample::new(Metric::Ndvi, 0.45)]);
    assert_eq!(composite.total_count, 6);
    assert_abs_diff_eq!(composite.overall_score, 50.0, epsilon = 1e-9);
}

#[test]
fn narrate_single_category() {
    let s = engine().narrate(ImpactCategory::Economic, 45.0);
    assert_eq!(s.category, ImpactCategory::Economic);
    assert_eq!(s.severity, Severity::Moderate);
    assert!(!s.positive.is_empty() && !s.risk.is_empty());
}

#[test]
fn assessment_serialises_to_json() {
    let a = engine().evaluate(&site("json", 800.0), Utc::now());
    let value = serde_json::to_value(&a).unwrap();
    assert!(value["composite"]["overallScore"].is_number());
    assert!(value["esv"]["adjustedValue"].is_number());
    assert!(value["projections"]["moderate"]["year5ESV"].is_number());
    assert_eq!(value["impacts"].as_array().unwrap().len(), 3);
}

#[test]
fn assessment_carries_data_quality_and_weighting() {
    let mut request = site("dqs", 600.0).ecosystem("Tropical Forest");
    request
        .observation
        .samples
        .retain(|s| s.metric != Metric::Temperature);
    let a = engine().evaluate(&request, Utc::now());
    let q = &a.composite.data_quality;
    assert_eq!(a.composite.weighting, "tropical_forest");
    assert_eq!(q.missing_critical, vec![Metric::Temperature]);
    assert!(q.score < 85.0);

    let value = serde_json::to_value(&a).unwrap();
    assert!(value["composite"]["dataQuality"]["score"].is_number());
    assert_eq!(value["composite"]["dataQuality"]["confidence"], "acceptable");
    assert_eq!(value["composite"]["weighting"], "tropical_forest");
}

#[test]
fn remote_sites_are_weighted_by_ecosystem() {
    let engine = EngineBuilder::new()
        .with_profile(WeightProfile::RemoteSensing)
        .build()
        .unwrap();
    let samples = vec![
        MetricSample::new(Metric::TreeCover, 95.0),
        MetricSample::new(Metric::DroughtIndex, 3.0),
    ];
    let forest = engine.evaluate(
        &SiteRequest::new("forest", samples.clone()).ecosystem("tropical_forest"),
        Utc::now(),
    );
    let wetland = engine.evaluate(
        &SiteRequest::new("wetland", samples).ecosystem("wetland"),
        Utc::now(),
    );
    // Carbon counts more in forests, degradation more in wetlands
    assert!(forest.composite.overall_score > wetland.composite.overall_score);
}
