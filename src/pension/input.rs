use crate::i18n::{keys, LocaleView};

use super::{PensionInput, Regime};

/// 입력 폼 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CurrentAge,
    RetirementAge,
    ContributionYears,
    AverageSalary,
    Regime,
}

impl Field {
    pub fn label_key(&self) -> &'static str {
        match self {
            Field::CurrentAge => keys::SIMULATOR_CURRENT_AGE,
            Field::RetirementAge => keys::SIMULATOR_RETIREMENT_AGE,
            Field::ContributionYears => keys::SIMULATOR_YEARS,
            Field::AverageSalary => keys::SIMULATOR_SALARY,
            Field::Regime => keys::SIMULATOR_REGIME,
        }
    }
}

/// 계산 전에 막아야 하는 입력 오류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("필수 입력 누락: {0:?}")]
    Missing(Field),
    #[error("잘못된 입력값: {0:?}")]
    Invalid(Field),
}

impl InputError {
    pub fn field(&self) -> Field {
        match self {
            InputError::Missing(f) | InputError::Invalid(f) => *f,
        }
    }

    /// 화면에 보여줄 번역 문구.
    pub fn localized(&self, tr: &LocaleView<'_>) -> String {
        let key = match self {
            InputError::Missing(_) => keys::INPUT_MISSING,
            InputError::Invalid(_) => keys::INPUT_INVALID,
        };
        tr.tf(key, &[("field", tr.t(self.field().label_key()))])
    }
}

/// 사용자가 입력한 원시 문자열 폼.
///
/// 모든 필드가 채워지고 숫자로 해석되어야 [`PensionInput`] 이 만들어진다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PensionForm {
    pub current_age: String,
    pub retirement_age: String,
    pub contribution_years: String,
    pub average_salary: String,
    pub regime: Option<Regime>,
}

impl PensionForm {
    pub fn parse(&self) -> Result<PensionInput, InputError> {
        let current_age = parse_age(&self.current_age, Field::CurrentAge)?;
        let retirement_age = parse_age(&self.retirement_age, Field::RetirementAge)?;
        let contribution_years = parse_count(&self.contribution_years, Field::ContributionYears)?;
        let average_salary = parse_amount(&self.average_salary, Field::AverageSalary)?;
        let regime = self.regime.ok_or(InputError::Missing(Field::Regime))?;
        Ok(PensionInput {
            current_age,
            retirement_age,
            contribution_years,
            average_salary,
            regime,
        })
    }

    /// 채워진 필드 비율 (0.0 ~ 1.0). 진행 막대용.
    pub fn filled_fraction(&self) -> f32 {
        let text_filled = [
            &self.current_age,
            &self.retirement_age,
            &self.contribution_years,
            &self.average_salary,
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .count();
        let filled = text_filled + usize::from(self.regime.is_some());
        filled as f32 / 5.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(raw: &str, field: Field) -> Result<String, InputError> {
    // "10 000" 같은 자릿수 공백을 허용한다
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        Err(InputError::Missing(field))
    } else {
        Ok(cleaned)
    }
}

/// 쉼표는 뒤에 1~2자리만 오는 단일 소수점일 때만 받는다.
/// "1,000" 같은 천 단위 구분자는 모호하므로 거부한다.
fn normalize_decimal_comma(s: &str) -> Option<String> {
    match s.split_once(',') {
        None => Some(s.to_string()),
        Some((int, frac)) => {
            let ok = !int.contains('.')
                && (1..=2).contains(&frac.len())
                && frac.chars().all(|c| c.is_ascii_digit());
            ok.then(|| format!("{int}.{frac}"))
        }
    }
}

fn parse_count(raw: &str, field: Field) -> Result<u32, InputError> {
    non_empty(raw, field)?
        .parse::<u32>()
        .map_err(|_| InputError::Invalid(field))
}

fn parse_age(raw: &str, field: Field) -> Result<u32, InputError> {
    match parse_count(raw, field)? {
        0 => Err(InputError::Invalid(field)),
        age => Ok(age),
    }
}

fn parse_amount(raw: &str, field: Field) -> Result<f64, InputError> {
    let cleaned = non_empty(raw, field)?;
    let value = normalize_decimal_comma(&cleaned)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or(InputError::Invalid(field))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InputError::Invalid(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> PensionForm {
        PensionForm {
            current_age: "45".into(),
            retirement_age: "60".into(),
            contribution_years: "20".into(),
            average_salary: "10 000,50".into(),
            regime: Some(Regime::Cnss),
        }
    }

    #[test]
    fn complete_form_parses() {
        let input = form().parse().unwrap();
        assert_eq!(input.current_age, 45);
        assert_eq!(input.contribution_years, 20);
        assert!((input.average_salary - 10_000.5).abs() < 1e-9);
    }

    #[test]
    fn zero_years_is_valid_but_zero_age_is_not() {
        let mut f = form();
        f.contribution_years = "0".into();
        assert!(f.parse().is_ok());
        f.current_age = "0".into();
        assert_eq!(f.parse(), Err(InputError::Invalid(Field::CurrentAge)));
    }

    #[test]
    fn blank_and_garbage_are_distinguished() {
        let mut f = form();
        f.average_salary = "   ".into();
        assert_eq!(f.parse(), Err(InputError::Missing(Field::AverageSalary)));
        f.average_salary = "-5".into();
        assert_eq!(f.parse(), Err(InputError::Invalid(Field::AverageSalary)));
        f.average_salary = "abc".into();
        assert_eq!(f.parse(), Err(InputError::Invalid(Field::AverageSalary)));
    }

    #[test]
    fn comma_is_decimal_only_with_up_to_two_digits() {
        let mut f = form();
        f.average_salary = "1,5".into();
        assert!((f.parse().unwrap().average_salary - 1.5).abs() < 1e-9);
        f.average_salary = "2500,75".into();
        assert!((f.parse().unwrap().average_salary - 2500.75).abs() < 1e-9);
        for raw in ["1,000", "1,000.50", "1,000,000", "12,", ",5,0"] {
            f.average_salary = raw.into();
            assert_eq!(f.parse(), Err(InputError::Invalid(Field::AverageSalary)), "{raw}");
        }
    }

    #[test]
    fn counts_reject_commas() {
        let mut f = form();
        f.contribution_years = "1,5".into();
        assert_eq!(f.parse(), Err(InputError::Invalid(Field::ContributionYears)));
    }

    #[test]
    fn regime_is_required() {
        let mut f = form();
        f.regime = None;
        assert_eq!(f.parse(), Err(InputError::Missing(Field::Regime)));
    }

    #[test]
    fn progress_counts_filled_fields() {
        let mut f = PensionForm::default();
        assert_eq!(f.filled_fraction(), 0.0);
        f.current_age = "50".into();
        f.regime = Some(Regime::Cmr);
        assert!((f.filled_fraction() - 0.4).abs() < 1e-6);
    }
}
