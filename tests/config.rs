//! 설정 파일 로드/저장 회귀 테스트.
use guide_retraite::config::{self, Config};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let cfg = config::load_or_default_at(&path).unwrap();
    assert!(path.exists());
    assert_eq!(cfg.language, "auto");
    assert_eq!(cfg.estimator, Config::default().estimator);
    assert_eq!(cfg.path(), Some(path.as_path()));
}

#[test]
fn saved_values_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut cfg = config::load_or_default_at(&path).unwrap();
    cfg.language = "ar".into();
    cfg.estimator.flat_rate_per_year_pct = 2.0;
    cfg.diagnostic.approaching_age = 57;
    cfg.save().unwrap();

    let reloaded = config::load_or_default_at(&path).unwrap();
    assert_eq!(reloaded.language, "ar");
    assert_eq!(reloaded.estimator.flat_rate_per_year_pct, 2.0);
    assert_eq!(reloaded.diagnostic.approaching_age, 57);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let partial = r#"
language = "fr"

[estimator.cmr]
threshold_years = 10
base_rate_pct = 50.0
step_per_year_pct = 1.0
max_rate_pct = 70.0
"#;
    fs::write(&path, partial).unwrap();
    let cfg = config::load_or_default_at(&path).unwrap();
    assert_eq!(cfg.language, "fr");
    assert_eq!(cfg.estimator.cmr.max_rate_pct, 70.0);
    assert_eq!(cfg.estimator.cmr.threshold_years, 10);
    assert_eq!(cfg.estimator.cnss, Config::default().estimator.cnss);
    assert_eq!(cfg.advisory, Config::default().advisory);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "language = [").unwrap();
    assert!(config::load_or_default_at(&path).is_err());
}

#[test]
fn single_field_regime_table_keeps_that_regimes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[estimator.cnss]\nmax_rate_pct = 62.0\n\n[estimator.cmr]\nthreshold_years = 12\n\n[estimator.rcar]\nannuity_years = 25\n",
    )
    .unwrap();
    let cfg = config::load_or_default_at(&path).unwrap();
    let defaults = Config::default().estimator;

    assert_eq!(cfg.estimator.cnss.max_rate_pct, 62.0);
    assert_eq!(cfg.estimator.cnss.threshold_years, defaults.cnss.threshold_years);
    assert_eq!(cfg.estimator.cnss.base_rate_pct, defaults.cnss.base_rate_pct);

    // CMR 은 CNSS 가 아닌 자기 기본값을 유지한다
    assert_eq!(cfg.estimator.cmr.threshold_years, 12);
    assert_eq!(cfg.estimator.cmr.max_rate_pct, 65.0);

    assert_eq!(cfg.estimator.rcar.annuity_years, 25);
    assert_eq!(cfg.estimator.rcar.contribution_rate, defaults.rcar.contribution_rate);
}
