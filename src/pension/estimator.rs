use crate::config::{
    AdvisoryThresholds, CapitalRegimeParams, Config, EstimatorConfig, ThresholdRegimeParams,
};
use crate::i18n::keys;

use super::{advisory, Formula, PensionInput, PensionResult, Regime};

/// 추정 방식. 두 방식은 같은 입력에 다른 값을 낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimateMethod {
    /// 제도별 공식
    RegimeBased,
    /// 연당 고정률 공식
    FlatRate,
}

impl EstimateMethod {
    pub fn label_key(&self) -> &'static str {
        match self {
            EstimateMethod::RegimeBased => keys::METHOD_REGIME,
            EstimateMethod::FlatRate => keys::METHOD_FLAT,
        }
    }
}

/// 연금 추정 전략의 공통 인터페이스.
///
/// 입력 검증은 [`super::PensionForm`] 에서 끝난 상태로 들어오므로 공식은 실패하지 않는다.
pub trait PensionEstimator {
    fn method(&self) -> EstimateMethod;
    fn estimate(&self, input: &PensionInput) -> PensionResult;
}

/// max(기준 나이 - 현재 나이, 최소 기간)
pub fn projection_years(current_age: u32, anchor: u32, floor: u32) -> u32 {
    anchor.saturating_sub(current_age).max(floor)
}

/// 임계 연수 방식 대체율 [%].
///
/// 임계 이상: base + (years - threshold) * step, 상한 max.
/// 임계 미만: (years / threshold) * base.
pub fn threshold_rate_pct(years: u32, p: &ThresholdRegimeParams) -> f64 {
    if p.threshold_years == 0 || years >= p.threshold_years {
        let extra = f64::from(years.saturating_sub(p.threshold_years)) * p.step_per_year_pct;
        (p.base_rate_pct + extra).min(p.max_rate_pct)
    } else {
        f64::from(years) / f64::from(p.threshold_years) * p.base_rate_pct
    }
}

/// 확정기여 적립 방식 연금액.
pub fn capital_annual_pension(salary: f64, years: u32, p: &CapitalRegimeParams) -> f64 {
    let annual_contribution = salary * p.contribution_rate;
    let capital = annual_contribution * f64::from(years) * (1.0 + p.annual_interest);
    capital / f64::from(p.annuity_years.max(1))
}

/// 제도별 공식 추정기.
#[derive(Debug, Clone, Default)]
pub struct RegimeBasedEstimator {
    pub params: EstimatorConfig,
    pub thresholds: AdvisoryThresholds,
}

impl RegimeBasedEstimator {
    pub fn new(params: EstimatorConfig, thresholds: AdvisoryThresholds) -> Self {
        Self { params, thresholds }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.estimator.clone(), cfg.advisory)
    }

    fn threshold_params(&self, regime: Regime) -> Option<&ThresholdRegimeParams> {
        match regime {
            Regime::Cnss => Some(&self.params.cnss),
            Regime::Cmr => Some(&self.params.cmr),
            Regime::Rcar => None,
        }
    }
}

impl PensionEstimator for RegimeBasedEstimator {
    fn method(&self) -> EstimateMethod {
        EstimateMethod::RegimeBased
    }

    fn estimate(&self, input: &PensionInput) -> PensionResult {
        let salary = input.average_salary;
        let years = input.contribution_years;
        let (annual_pension, replacement_rate_pct, formula) = match self.threshold_params(input.regime) {
            Some(p) => {
                let rate = threshold_rate_pct(years, p);
                (
                    salary * rate / 100.0,
                    rate,
                    Formula::Threshold {
                        base_rate_pct: p.base_rate_pct,
                        threshold_years: p.threshold_years,
                        step_per_year_pct: p.step_per_year_pct,
                        max_rate_pct: p.max_rate_pct,
                    },
                )
            }
            None => {
                let p = &self.params.rcar;
                let annual = capital_annual_pension(salary, years, p);
                let rate = if salary > 0.0 {
                    annual / salary * 100.0
                } else {
                    0.0
                };
                (
                    annual,
                    rate,
                    Formula::Capital {
                        contribution_rate: p.contribution_rate,
                        annual_interest: p.annual_interest,
                        annuity_years: p.annuity_years,
                    },
                )
            }
        };
        let monthly_pension = annual_pension / 12.0;
        let advisories = advisory::collect(input, monthly_pension, None, &self.thresholds);
        log::debug!(
            "regime estimate: regime={} years={years} rate={replacement_rate_pct:.2}% annual={annual_pension:.2}",
            input.regime.code()
        );
        PensionResult {
            monthly_pension,
            annual_pension,
            replacement_rate_pct,
            projection_years: projection_years(
                input.current_age,
                self.params.life_expectancy_anchor,
                self.params.projection_floor_years,
            ),
            advisories,
            method: EstimateMethod::RegimeBased,
            formula,
            input: *input,
        }
    }
}

/// 연당 고정률 추정기. 제도와 무관하며 상한이 없다.
#[derive(Debug, Clone)]
pub struct FlatRateEstimator {
    pub rate_per_year_pct: f64,
    pub life_expectancy_anchor: u32,
    pub projection_floor_years: u32,
    pub thresholds: AdvisoryThresholds,
}

impl Default for FlatRateEstimator {
    fn default() -> Self {
        Self::from_parts(&EstimatorConfig::default(), AdvisoryThresholds::default())
    }
}

impl FlatRateEstimator {
    pub fn from_parts(params: &EstimatorConfig, thresholds: AdvisoryThresholds) -> Self {
        Self {
            rate_per_year_pct: params.flat_rate_per_year_pct,
            life_expectancy_anchor: params.life_expectancy_anchor,
            projection_floor_years: params.projection_floor_years,
            thresholds,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::from_parts(&cfg.estimator, cfg.advisory)
    }
}

impl PensionEstimator for FlatRateEstimator {
    fn method(&self) -> EstimateMethod {
        EstimateMethod::FlatRate
    }

    fn estimate(&self, input: &PensionInput) -> PensionResult {
        let total_pct = self.rate_per_year_pct * f64::from(input.contribution_years);
        let monthly_pension = input.average_salary * (total_pct / 100.0);
        let annual_pension = monthly_pension * 12.0;
        let advisories =
            advisory::collect(input, monthly_pension, Some(total_pct), &self.thresholds);
        log::debug!(
            "flat estimate: years={} total={total_pct:.2}% monthly={monthly_pension:.2}",
            input.contribution_years
        );
        PensionResult {
            monthly_pension,
            annual_pension,
            replacement_rate_pct: total_pct,
            projection_years: projection_years(
                input.current_age,
                self.life_expectancy_anchor,
                self.projection_floor_years,
            ),
            advisories,
            method: EstimateMethod::FlatRate,
            formula: Formula::Flat {
                rate_per_year_pct: self.rate_per_year_pct,
            },
            input: *input,
        }
    }
}

/// 설정으로 지정한 방식의 추정기를 만든다.
pub fn estimator_for(method: EstimateMethod, cfg: &Config) -> Box<dyn PensionEstimator> {
    match method {
        EstimateMethod::RegimeBased => Box::new(RegimeBasedEstimator::from_config(cfg)),
        EstimateMethod::FlatRate => Box::new(FlatRateEstimator::from_config(cfg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_rate_prorates_below_threshold() {
        let p = EstimatorConfig::default().cnss;
        assert!((threshold_rate_pct(0, &p) - 0.0).abs() < 1e-12);
        assert!((threshold_rate_pct(6, &p) - 20.0).abs() < 1e-9);
        assert!((threshold_rate_pct(15, &p) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn cmr_caps_at_sixty_five() {
        let p = EstimatorConfig::default().cmr;
        assert!((threshold_rate_pct(14, &p) - 54.0).abs() < 1e-12);
        assert!((threshold_rate_pct(40, &p) - 65.0).abs() < 1e-12);
    }

    #[test]
    fn zero_threshold_never_divides() {
        let p = ThresholdRegimeParams {
            threshold_years: 0,
            base_rate_pct: 50.0,
            step_per_year_pct: 1.0,
            max_rate_pct: 60.0,
        };
        assert!((threshold_rate_pct(0, &p) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn projection_uses_floor_past_anchor() {
        assert_eq!(projection_years(50, 85, 20), 35);
        assert_eq!(projection_years(70, 85, 20), 20);
        assert_eq!(projection_years(95, 85, 20), 20);
    }

    #[test]
    fn rcar_capital_annuity() {
        let annual = capital_annual_pension(10_000.0, 20, &EstimatorConfig::default().rcar);
        assert!((annual - 1224.0).abs() < 1e-9, "annual={annual}");
    }
}
