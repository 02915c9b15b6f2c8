use phiscore::config::TuningParams;
use phiscore::scorer::Curve;
use phiscore::tables::default_curves;
use phiscore::valuation::{phi_multiplier, MultiplierParams};
use phiscore::{Metric, MetricSample, ReferenceTables, Scorer, WeightProfile};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

// --- STRATEGIES ---

fn arb_metric() -> impl Strategy<Value = Metric> {
    let all: Vec<Metric> = Metric::iter().collect();
    proptest::sample::select(all)
}

// Wide enough to cover every curve's shoulders, plus the odd non-finite value
fn arb_reading() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        8 => (-5000.0..5000.0f64).prop_map(Some),
        1 => Just(None),
        1 => Just(Some(f64::NAN)),
    ]
}

prop_compose! {
    fn arb_sample()(metric in arb_metric(), value in arb_reading()) -> MetricSample {
        MetricSample { metric, value }
    }
}

prop_compose! {
    fn arb_sensor_samples()(
        co2 in 300.0..3000.0f64,
        temp in -10.0..45.0f64,
        hum in 0.0..100.0f64,
        light in 0.0..5000.0f64,
        pressure in 950.0..1050.0f64,
    ) -> Vec<MetricSample> {
        vec![
            MetricSample::new(Metric::Co2, co2),
            MetricSample::new(Metric::Temperature, temp),
            MetricSample::new(Metric::Humidity, hum),
            MetricSample::new(Metric::Light, light),
            MetricSample::new(Metric::Pressure, pressure),
        ]
    }
}

fn scorer(profile: WeightProfile) -> Scorer {
    Scorer::new(
        Arc::new(ReferenceTables::default()),
        profile,
        TuningParams::default(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn curves_stay_in_bounds(metric in arb_metric(), x in -1.0e6..1.0e6f64) {
        let curves: BTreeMap<Metric, Curve> = default_curves();
        let score = curves[&metric].evaluate(x);
        prop_assert!((0.0..=100.0).contains(&score), "{} at {} -> {}", metric, x, score);
    }

    #[test]
    fn curves_survive_extremes(metric in arb_metric()) {
        let curves = default_curves();
        for x in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, -0.0] {
            let score = curves[&metric].evaluate(x);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn gaussians_are_symmetric(d in 0.0..30.0f64) {
        let sc = scorer(WeightProfile::Sensor);
        let above = sc.normalize(Metric::Temperature, 22.0 + d).unwrap().score;
        let below = sc.normalize(Metric::Temperature, 22.0 - d).unwrap().score;
        prop_assert!((above - below).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn multiplier_is_clamped(score in -1000.0..1000.0f64) {
        let m = phi_multiplier(score, &MultiplierParams::default());
        prop_assert!((-0.30..=0.50).contains(&m));
    }

    // The log term flattens the curve below a score of roughly 10, so
    // monotonicity only holds above that.
    #[test]
    fn multiplier_is_monotonic(a in 20.0..100.0f64, b in 20.0..100.0f64) {
        let p = MultiplierParams::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(phi_multiplier(lo, &p) <= phi_multiplier(hi, &p));
    }

    #[test]
    fn composite_is_order_invariant(
        samples in proptest::collection::vec(arb_sample(), 0..20),
        seed in any::<u64>(),
    ) {
        let sc = scorer(WeightProfile::Sensor);
        let expected = sc.aggregate(&samples);

        let mut shuffled = samples.clone();
        // Deterministic rotation and reversal stand in for a shuffle
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
        }
        shuffled.reverse();
        prop_assert_eq!(sc.aggregate(&shuffled), expected);
    }

    #[test]
    fn composite_lies_within_available_scores(samples in arb_sensor_samples()) {
        let result = scorer(WeightProfile::Sensor).aggregate(&samples);
        let scores: Vec<f64> = result.available().map(|s| s.score).collect();
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(result.overall_score >= min - 0.05 && result.overall_score <= max + 0.05);
        prop_assert!(!result.is_partial);
    }

    #[test]
    fn any_input_yields_a_well_formed_composite(
        samples in proptest::collection::vec(arb_sample(), 0..30),
        profile in prop_oneof![Just(WeightProfile::Sensor), Just(WeightProfile::RemoteSensing)],
    ) {
        let result = scorer(profile).aggregate(&samples);
        prop_assert!((0.0..=100.0).contains(&result.overall_score));
        prop_assert_eq!(
            result.available_count + result.missing_metrics.len(),
            result.total_count
        );
        prop_assert_eq!(result.is_partial, result.available_count < result.total_count);
    }
}
