//! 두 추정 방식의 공식/안내 회귀 테스트.
use guide_retraite::config::{AdvisoryThresholds, Config, EstimatorConfig};
use guide_retraite::pension::{
    estimator_for, Advisory, EstimateMethod, FlatRateEstimator, PensionEstimator, PensionInput,
    Regime, RegimeBasedEstimator,
};
use pretty_assertions::assert_eq;

fn input(regime: Regime, years: u32, salary: f64) -> PensionInput {
    PensionInput {
        current_age: 45,
        retirement_age: 60,
        contribution_years: years,
        average_salary: salary,
        regime,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn zero_years_gives_zero_everywhere() {
    let regime = RegimeBasedEstimator::default();
    for r in Regime::ALL {
        let res = regime.estimate(&input(r, 0, 10_000.0));
        assert!(close(res.monthly_pension, 0.0), "{r:?}");
        assert!(close(res.annual_pension, 0.0), "{r:?}");
    }
    let flat = FlatRateEstimator::default().estimate(&input(Regime::Cnss, 0, 10_000.0));
    assert!(close(flat.monthly_pension, 0.0));
}

#[test]
fn cnss_reaches_base_rate_at_threshold_and_caps() {
    let est = RegimeBasedEstimator::default();
    let at_threshold = est.estimate(&input(Regime::Cnss, 15, 10_000.0));
    assert!(close(at_threshold.replacement_rate_pct, 50.0));
    let long = est.estimate(&input(Regime::Cnss, 35, 10_000.0));
    assert!(close(long.replacement_rate_pct, 60.0));
}

#[test]
fn cnss_twenty_years_example() {
    let res = RegimeBasedEstimator::default().estimate(&input(Regime::Cnss, 20, 10_000.0));
    assert!(close(res.replacement_rate_pct, 55.0));
    assert!(close(res.annual_pension, 5_500.0));
    assert!(close(res.monthly_pension, 5_500.0 / 12.0));
    assert_eq!(format!("{:.2}", res.monthly_pension), "458.33");
}

#[test]
fn monthly_is_annual_over_twelve_for_every_regime() {
    let est = RegimeBasedEstimator::default();
    for r in Regime::ALL {
        for years in [3, 12, 27] {
            let res = est.estimate(&input(r, years, 8_750.0));
            assert!(close(res.monthly_pension * 12.0, res.annual_pension), "{r:?} {years}");
        }
    }
}

#[test]
fn rcar_capitalizes_contributions() {
    let res = RegimeBasedEstimator::default().estimate(&input(Regime::Rcar, 10, 10_000.0));
    // 10000 * 0.12 * 10 * 1.02 / 20
    assert!(close(res.annual_pension, 612.0));
}

#[test]
fn flat_rate_differs_from_regime_estimate() {
    let flat = FlatRateEstimator::default().estimate(&input(Regime::Cnss, 20, 10_000.0));
    assert!(close(flat.replacement_rate_pct, 50.0));
    assert!(close(flat.monthly_pension, 5_000.0));
    assert!(close(flat.annual_pension, 60_000.0));
    let regime = RegimeBasedEstimator::default().estimate(&input(Regime::Cnss, 20, 10_000.0));
    assert!(!close(flat.monthly_pension, regime.monthly_pension));
    assert_eq!(flat.method, EstimateMethod::FlatRate);
    assert_eq!(regime.method, EstimateMethod::RegimeBased);
}

#[test]
fn flat_rate_ignores_regime_and_has_no_cap() {
    let est = FlatRateEstimator::default();
    let a = est.estimate(&input(Regime::Cnss, 45, 4_000.0));
    let b = est.estimate(&input(Regime::Rcar, 45, 4_000.0));
    assert!(close(a.monthly_pension, b.monthly_pension));
    assert!(close(a.replacement_rate_pct, 112.5));
    assert!(a.advisories.contains(&Advisory::AboveSalary));
}

#[test]
fn advisories_cover_short_career_low_pension_and_age() {
    let mut i = input(Regime::Cnss, 3, 2_000.0);
    i.retirement_age = 40;
    let res = FlatRateEstimator::default().estimate(&i);
    assert_eq!(
        res.advisories,
        vec![
            Advisory::VeryShortCareer,
            Advisory::LowPension,
            Advisory::InvalidRetirementAge
        ]
    );
}

#[test]
fn full_career_advisory_from_twenty_years() {
    let res = RegimeBasedEstimator::default().estimate(&input(Regime::Cmr, 20, 30_000.0));
    assert_eq!(res.advisories, vec![Advisory::FullCareer]);
}

#[test]
fn projection_uses_anchor_with_floor() {
    let est = RegimeBasedEstimator::default();
    let mut i = input(Regime::Cnss, 20, 10_000.0);
    i.current_age = 50;
    assert_eq!(est.estimate(&i).projection_years, 35);
    i.current_age = 70;
    assert_eq!(est.estimate(&i).projection_years, 20);
}

#[test]
fn configured_rates_flow_into_estimators() {
    let mut cfg = Config::default();
    cfg.estimator.flat_rate_per_year_pct = 2.0;
    cfg.estimator.cnss.max_rate_pct = 55.0;
    let flat = estimator_for(EstimateMethod::FlatRate, &cfg);
    let res = flat.estimate(&input(Regime::Cnss, 10, 1_000.0));
    assert!(close(res.monthly_pension, 200.0));
    let regime = estimator_for(EstimateMethod::RegimeBased, &cfg);
    let res = regime.estimate(&input(Regime::Cnss, 40, 1_000.0));
    assert!(close(res.replacement_rate_pct, 55.0));
}

#[test]
fn custom_thresholds_change_advisories() {
    let t = AdvisoryThresholds {
        low_monthly_pension: 0.0,
        ..AdvisoryThresholds::default()
    };
    let est = RegimeBasedEstimator::new(EstimatorConfig::default(), t);
    let res = est.estimate(&input(Regime::Cnss, 12, 100.0));
    assert!(res.advisories.is_empty());
}
