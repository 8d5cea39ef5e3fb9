use crate::config::AdvisoryThresholds;
use crate::i18n::keys;

use super::PensionInput;

/// 결과에 붙는 비차단 안내. 언어와 무관한 코드로 보관한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// 기여 연수가 매우 짧음
    VeryShortCareer,
    /// 기여 연수가 짧음
    ShortCareer,
    /// 완전 연금 수준의 기여 연수
    FullCareer,
    /// 은퇴 예정 나이가 현재 나이 이하
    InvalidRetirementAge,
    /// 월 연금이 낮음
    LowPension,
    /// 정액 공식의 비율이 급여의 100%를 넘음
    AboveSalary,
}

impl Advisory {
    pub fn key(&self) -> &'static str {
        match self {
            Advisory::VeryShortCareer => keys::ADVISORY_VERY_SHORT_CAREER,
            Advisory::ShortCareer => keys::ADVISORY_SHORT_CAREER,
            Advisory::FullCareer => keys::ADVISORY_FULL_CAREER,
            Advisory::InvalidRetirementAge => keys::ADVISORY_INVALID_RETIREMENT_AGE,
            Advisory::LowPension => keys::ADVISORY_LOW_PENSION,
            Advisory::AboveSalary => keys::ADVISORY_ABOVE_SALARY,
        }
    }
}

/// 기여 연수에 따른 안내. 짧은 경력과 완전 경력은 서로 배타적이다.
pub fn career_advisory(years: u32, t: &AdvisoryThresholds) -> Option<Advisory> {
    if years < t.very_short_years {
        Some(Advisory::VeryShortCareer)
    } else if years < t.short_years {
        Some(Advisory::ShortCareer)
    } else if years >= t.full_career_years {
        Some(Advisory::FullCareer)
    } else {
        None
    }
}

/// 두 추정기가 공유하는 안내 목록을 만든다.
///
/// 순서: 경력, 저연금, (정액 전용) 급여 초과, 나이.
pub fn collect(
    input: &PensionInput,
    monthly_pension: f64,
    total_rate_pct: Option<f64>,
    t: &AdvisoryThresholds,
) -> Vec<Advisory> {
    let mut out = Vec::new();
    if let Some(a) = career_advisory(input.contribution_years, t) {
        out.push(a);
    }
    if monthly_pension < t.low_monthly_pension {
        out.push(Advisory::LowPension);
    }
    if total_rate_pct.is_some_and(|pct| pct > 100.0) {
        out.push(Advisory::AboveSalary);
    }
    if input.retirement_age <= input.current_age {
        out.push(Advisory::InvalidRetirementAge);
    }
    out
}
