use approx::assert_abs_diff_eq;
use phiscore::projection::{
    cumulative_carbon, default_scenarios, project, validate_scenarios, Scenario,
    ScenarioDefinition,
};
use rstest::{fixture, rstest};

#[fixture]
fn defs() -> Vec<ScenarioDefinition> {
    default_scenarios()
}

#[rstest]
#[case(Scenario::Conservative)]
#[case(Scenario::Moderate)]
#[case(Scenario::Optimistic)]
fn year_zero_is_the_present(defs: Vec<ScenarioDefinition>, #[case] scenario: Scenario) {
    let all = project(&defs, 3500.0, 50.0, 0.3);
    let p = all.get(scenario).at_year(0).unwrap();
    assert_eq!(p.esv, 3500.0);
    assert_eq!(p.phi, 50.0);
    assert_eq!(p.cumulative_carbon, 0.0);
}

#[rstest]
fn reports_the_fixed_year_sets(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 3500.0, 50.0, 0.3);
    for p in all.iter() {
        let years: Vec<u32> = p.projections.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![0, 1, 3, 5]);
        let carbon_years: Vec<u32> = p.carbon_series.iter().map(|c| c.year).collect();
        assert_eq!(carbon_years, vec![1, 2, 3, 4, 5]);
    }
}

#[rstest]
fn scenarios_are_ordered_every_year(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 4200.0, 63.0, 0.3);
    for year in [1, 3, 5] {
        let esv = |s| all.get(s).at_year(year).unwrap().esv;
        assert!(esv(Scenario::Conservative) < esv(Scenario::Moderate));
        assert!(esv(Scenario::Moderate) < esv(Scenario::Optimistic));
    }
    assert!(all.conservative.total_carbon < all.moderate.total_carbon);
    assert!(all.moderate.total_carbon < all.optimistic.total_carbon);
}

#[rstest]
fn cumulative_carbon_is_ordered_every_year(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 4200.0, 63.0, 0.3);
    let c = &all.conservative.carbon_series;
    let m = &all.moderate.carbon_series;
    let o = &all.optimistic.carbon_series;
    assert_eq!(c.len(), 5);
    for i in 0..c.len() {
        assert_eq!(c[i].year, m[i].year);
        assert_eq!(m[i].year, o[i].year);
        assert!(c[i].cumulative_carbon <= m[i].cumulative_carbon);
        assert!(m[i].cumulative_carbon <= o[i].cumulative_carbon);
    }
}

#[rstest]
fn moderate_five_year_growth(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 3500.0, 50.0, 0.3);
    let m = &all.moderate;
    assert_abs_diff_eq!(m.year5_esv, 3500.0 * 1.045f64.powi(5), epsilon = 1e-6);
    assert_eq!(m.esv_growth_percent, 25);
    assert_eq!(m.label, "Moderate");
}

#[rstest]
fn total_carbon_is_the_year_five_cumulative(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 3500.0, 50.0, 0.3);
    for (p, def) in all.iter().zip(defs.iter()) {
        assert_eq!(p.total_carbon, cumulative_carbon(def, 5));
        let last = p.carbon_series.last().unwrap();
        assert_eq!(last.cumulative_carbon, p.total_carbon);
        assert!(p
            .carbon_series
            .windows(2)
            .all(|w| w[1].cumulative_carbon > w[0].cumulative_carbon));
    }
}

#[rstest]
fn health_score_never_passes_ceiling(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 3500.0, 99.0, 5.0);
    for p in all.iter() {
        assert!(p.projections.iter().all(|y| y.phi <= 100.0));
    }
}

#[rstest]
fn zero_value_has_zero_growth(defs: Vec<ScenarioDefinition>) {
    let all = project(&defs, 0.0, 0.0, 0.3);
    for p in all.iter() {
        assert_eq!(p.esv_growth_percent, 0);
        assert_eq!(p.year5_esv, 0.0);
        assert!(p.total_carbon > 0.0);
    }
}

#[test]
fn scenario_rates_must_increase() {
    let mut defs = default_scenarios();
    defs[2].growth_rate = defs[1].growth_rate;
    assert!(validate_scenarios(&defs).is_err());

    let mut defs = default_scenarios();
    defs.pop();
    assert!(validate_scenarios(&defs).is_err());
}
