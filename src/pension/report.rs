use crate::i18n::{keys, LocaleView};

use super::{DiagnosticReport, Formula, PensionResult};

/// 금액을 소수 둘째 자리까지 표시한다.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// 비율 [%] 을 표시한다. 정수면 소수점을 생략한다.
pub fn format_percent(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0} %")
    } else {
        format!("{value:.2} %")
    }
}

fn trim_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// 공식 설명 문구.
pub fn describe_formula(formula: &Formula, tr: &LocaleView<'_>) -> String {
    match *formula {
        Formula::Threshold {
            base_rate_pct,
            threshold_years,
            step_per_year_pct,
            max_rate_pct,
        } => tr.tf(
            keys::FORMULA_THRESHOLD,
            &[
                ("base", trim_number(base_rate_pct)),
                ("threshold", threshold_years.to_string()),
                ("step", trim_number(step_per_year_pct)),
                ("cap", trim_number(max_rate_pct)),
            ],
        ),
        Formula::Capital {
            contribution_rate,
            annual_interest,
            annuity_years,
        } => tr.tf(
            keys::FORMULA_CAPITAL,
            &[
                ("contribution", trim_number(contribution_rate * 100.0)),
                ("interest", trim_number(annual_interest * 100.0)),
                ("horizon", annuity_years.to_string()),
            ],
        ),
        Formula::Flat { rate_per_year_pct } => {
            tr.tf(keys::FORMULA_FLAT, &[("rate", trim_number(rate_per_year_pct))])
        }
    }
}

/// 추정 결과의 (라벨, 값) 행. CLI 출력과 GUI 격자가 함께 쓴다.
pub fn summary_rows(result: &PensionResult, tr: &LocaleView<'_>) -> Vec<(String, String)> {
    let currency = tr.t(keys::CURRENCY);
    let years = tr.t(keys::YEARS_UNIT);
    vec![
        (
            tr.t(keys::RESULT_MONTHLY),
            format!("{} {currency}", format_amount(result.monthly_pension)),
        ),
        (
            tr.t(keys::RESULT_ANNUAL),
            format!("{} {currency}", format_amount(result.annual_pension)),
        ),
        (tr.t(keys::RESULT_RATE), format_percent(result.replacement_rate_pct)),
        (
            tr.t(keys::RESULT_PROJECTION),
            format!("{} {years}", result.projection_years),
        ),
    ]
}

/// 계산 근거 행.
pub fn breakdown_rows(result: &PensionResult, tr: &LocaleView<'_>) -> Vec<(String, String)> {
    let input = &result.input;
    let mut rows = vec![
        (tr.t(keys::SIMULATOR_REGIME), tr.t(input.regime.label_key())),
        (
            tr.t(keys::SIMULATOR_SALARY),
            format!("{} {}", format_amount(input.average_salary), tr.t(keys::CURRENCY)),
        ),
        (
            tr.t(keys::SIMULATOR_YEARS),
            format!("{} {}", input.contribution_years, tr.t(keys::YEARS_UNIT)),
        ),
    ];
    rows.push((tr.t(keys::RESULT_FORMULA), describe_formula(&result.formula, tr)));
    rows
}

/// 안내 문구 목록.
pub fn advisory_lines(result: &PensionResult, tr: &LocaleView<'_>) -> Vec<String> {
    result.advisories.iter().map(|a| tr.t(a.key())).collect()
}

/// 텍스트 보고서. 내보내기 파일과 CLI 출력에 쓴다.
pub fn render_estimate(result: &PensionResult, tr: &LocaleView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} | {}\n",
        tr.t(keys::RESULT_TITLE),
        tr.t(result.method.label_key())
    ));
    for (label, value) in summary_rows(result, tr) {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out.push_str(&format!("\n{}\n", tr.t(keys::RESULT_BREAKDOWN)));
    for (label, value) in breakdown_rows(result, tr) {
        out.push_str(&format!("  {label}: {value}\n"));
    }
    let advisories = advisory_lines(result, tr);
    if !advisories.is_empty() {
        out.push_str(&format!("\n{}\n", tr.t(keys::RESULT_ADVISORIES)));
        for line in advisories {
            out.push_str(&format!("  - {line}\n"));
        }
    }
    out.push_str(&format!("\n{}\n", tr.t(keys::RESULT_DISCLAIMER)));
    out
}

pub fn render_diagnostic(report: &DiagnosticReport, tr: &LocaleView<'_>) -> String {
    let mut out = format!("{}\n", tr.t(keys::DIAGNOSTIC_RESULT_TITLE));
    for line in report.render(tr) {
        out.push_str(&format!("  - {line}\n"));
    }
    out
}
