use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 기여 임계 연수 방식 제도(CNSS, CMR)의 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRegimeParams {
    /// 기본율을 받기 위한 최소 기여 연수
    pub threshold_years: u32,
    /// 임계 연수 도달 시 대체율 [%]
    pub base_rate_pct: f64,
    /// 임계 초과 1년당 가산 [%p]
    pub step_per_year_pct: f64,
    /// 대체율 상한 [%]
    pub max_rate_pct: f64,
}

/// 확정기여 적립 방식 제도(RCAR)의 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalRegimeParams {
    /// 급여 대비 기여율 (0.12 = 12%)
    pub contribution_rate: f64,
    /// 가정 연 이자율 (0.02 = 2%)
    pub annual_interest: f64,
    /// 연금 지급 기간 [년]
    pub annuity_years: u32,
}

/// 연금 추정기 파라미터.
///
/// 제도별 하위 테이블은 일부 필드만 적어도 되며, 빠진 필드는 그 제도의 기본값을 쓴다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    #[serde(deserialize_with = "cnss_params")]
    pub cnss: ThresholdRegimeParams,
    #[serde(deserialize_with = "cmr_params")]
    pub cmr: ThresholdRegimeParams,
    #[serde(deserialize_with = "rcar_params")]
    pub rcar: CapitalRegimeParams,
    /// 정액 추정기의 기여 1년당 지급률 [%]
    pub flat_rate_per_year_pct: f64,
    /// 예상 기간 계산 기준 나이
    pub life_expectancy_anchor: u32,
    /// 예상 기간 최소값 [년]
    pub projection_floor_years: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            cnss: ThresholdRegimeParams {
                threshold_years: 15,
                base_rate_pct: 50.0,
                step_per_year_pct: 1.0,
                max_rate_pct: 60.0,
            },
            cmr: ThresholdRegimeParams {
                threshold_years: 10,
                base_rate_pct: 50.0,
                step_per_year_pct: 1.0,
                max_rate_pct: 65.0,
            },
            rcar: CapitalRegimeParams {
                contribution_rate: 0.12,
                annual_interest: 0.02,
                annuity_years: 20,
            },
            flat_rate_per_year_pct: 2.5,
            life_expectancy_anchor: 85,
            projection_floor_years: 20,
        }
    }
}

/// 일부만 적힌 임계 연수 방식 하위 테이블.
#[derive(Deserialize)]
struct PartialThresholdParams {
    threshold_years: Option<u32>,
    base_rate_pct: Option<f64>,
    step_per_year_pct: Option<f64>,
    max_rate_pct: Option<f64>,
}

impl PartialThresholdParams {
    fn over(self, base: ThresholdRegimeParams) -> ThresholdRegimeParams {
        ThresholdRegimeParams {
            threshold_years: self.threshold_years.unwrap_or(base.threshold_years),
            base_rate_pct: self.base_rate_pct.unwrap_or(base.base_rate_pct),
            step_per_year_pct: self.step_per_year_pct.unwrap_or(base.step_per_year_pct),
            max_rate_pct: self.max_rate_pct.unwrap_or(base.max_rate_pct),
        }
    }
}

/// 일부만 적힌 확정기여 방식 하위 테이블.
#[derive(Deserialize)]
struct PartialCapitalParams {
    contribution_rate: Option<f64>,
    annual_interest: Option<f64>,
    annuity_years: Option<u32>,
}

fn cnss_params<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdRegimeParams, D::Error> {
    PartialThresholdParams::deserialize(d).map(|p| p.over(EstimatorConfig::default().cnss))
}

fn cmr_params<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdRegimeParams, D::Error> {
    PartialThresholdParams::deserialize(d).map(|p| p.over(EstimatorConfig::default().cmr))
}

fn rcar_params<'de, D: Deserializer<'de>>(d: D) -> Result<CapitalRegimeParams, D::Error> {
    let p = PartialCapitalParams::deserialize(d)?;
    let base = EstimatorConfig::default().rcar;
    Ok(CapitalRegimeParams {
        contribution_rate: p.contribution_rate.unwrap_or(base.contribution_rate),
        annual_interest: p.annual_interest.unwrap_or(base.annual_interest),
        annuity_years: p.annuity_years.unwrap_or(base.annuity_years),
    })
}

/// 안내 메시지 임계값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryThresholds {
    /// 이 연수 미만이면 매우 짧은 경력
    pub very_short_years: u32,
    /// 이 연수 미만이면 짧은 경력
    pub short_years: u32,
    /// 이 연수 이상이면 완전 경력
    pub full_career_years: u32,
    /// 월 연금이 이 금액 미만이면 저연금 안내 [DH]
    pub low_monthly_pension: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            very_short_years: 5,
            short_years: 10,
            full_career_years: 20,
            low_monthly_pension: 1000.0,
        }
    }
}

/// 진단 흐름 임계값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticThresholds {
    /// 이 나이 이상이면 은퇴 임박
    pub approaching_age: u32,
    pub low_years: u32,
    pub good_years: u32,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self {
            approaching_age: 55,
            low_years: 10,
            good_years: 20,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `auto`, `fr`, `ar`
    pub language: String,
    /// 내장 언어팩을 덮어쓸 디렉터리
    pub language_pack_dir: Option<String>,
    pub estimator: EstimatorConfig,
    pub advisory: AdvisoryThresholds,
    pub diagnostic: DiagnosticThresholds,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            estimator: EstimatorConfig::default(),
            advisory: AdvisoryThresholds::default(),
            diagnostic: DiagnosticThresholds::default(),
            path: None,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(DEFAULT_CONFIG_PATH)
}

/// 지정 경로의 설정을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default_at(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str::<Config>(&content)?
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("default configuration written to {}", path.display());
        cfg
    };
    cfg.path = Some(path.to_path_buf());
    Ok(cfg)
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 로드한 경로(없으면 config.toml)에 설정을 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        save_config(self, &path)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
