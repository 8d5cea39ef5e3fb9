//! 연금 추정 및 진단 모듈 모음.
//!
//! 계산 결과는 언어와 무관한 값(금액, 비율, 안내 코드)만 담는다.
//! 문자열 변환은 [`report`] 에서 [`crate::i18n::LocaleView`] 로 한다.

pub mod advisory;
pub mod diagnostic;
pub mod estimator;
pub mod input;
pub mod report;

pub use advisory::Advisory;
pub use diagnostic::{
    diagnose, DiagnosticInput, DiagnosticMessage, DiagnosticReport, Organization, Status,
};
pub use estimator::*;
pub use input::{Field, InputError, PensionForm};

use serde::{Deserialize, Serialize};

use crate::i18n::keys;

/// 연금 제도. A=CNSS(민간), B=CMR(공무원), C=RCAR(공공기관).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Cnss,
    Cmr,
    Rcar,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Cnss, Regime::Cmr, Regime::Rcar];

    pub fn label_key(&self) -> &'static str {
        match self {
            Regime::Cnss => keys::REGIME_CNSS,
            Regime::Cmr => keys::REGIME_CMR,
            Regime::Rcar => keys::REGIME_RCAR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Regime::Cnss => "cnss",
            Regime::Cmr => "cmr",
            Regime::Rcar => "rcar",
        }
    }
}

/// 검증을 통과한 추정 입력.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PensionInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub contribution_years: u32,
    /// 월 평균 급여 [DH]
    pub average_salary: f64,
    pub regime: Regime,
}

/// 결과에 사용된 공식. 보고서에서 설명 문구를 만들 때 쓴다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formula {
    /// 임계 연수 + 연당 가산 + 상한
    Threshold {
        base_rate_pct: f64,
        threshold_years: u32,
        step_per_year_pct: f64,
        max_rate_pct: f64,
    },
    /// 확정기여 적립 후 연금화
    Capital {
        contribution_rate: f64,
        annual_interest: f64,
        annuity_years: u32,
    },
    /// 연당 고정률, 상한 없음
    Flat { rate_per_year_pct: f64 },
}

/// 추정 결과. 금액은 반올림하지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct PensionResult {
    pub monthly_pension: f64,
    pub annual_pension: f64,
    /// 대체율 [%]
    pub replacement_rate_pct: f64,
    /// 예상 수령 기간 [년]
    pub projection_years: u32,
    pub advisories: Vec<Advisory>,
    pub method: EstimateMethod,
    pub formula: Formula,
    pub input: PensionInput,
}
