use std::io::{self, BufRead, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::i18n::{keys, Direction, Language, LocaleView, Localizer};
use crate::pension::{
    self, report, DiagnosticInput, EstimateMethod, Organization, PensionForm, Regime, Status,
};

/// RTL 출력 시 오른쪽 정렬 기준 폭 (문자 수).
pub const LINE_WIDTH: usize = 72;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Simulator,
    FlatRate,
    Diagnostic,
    Language,
    Exit,
}

/// RTL 이면 줄마다 오른쪽으로 붙인다.
pub fn align_line(line: &str, dir: Direction, width: usize) -> String {
    if !dir.is_rtl() {
        return line.to_string();
    }
    let len = line.chars().count();
    if len >= width {
        line.to_string()
    } else {
        format!("{}{line}", " ".repeat(width - len))
    }
}

/// 현재 방향에 맞춰 출력한다.
pub fn say(tr: &LocaleView<'_>, text: &str) {
    for line in text.split('\n') {
        println!("{}", align_line(line, tr.direction(), LINE_WIDTH));
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &LocaleView<'_>) -> Result<MenuChoice, AppError> {
    main_menu_from(tr, &mut io::stdin().lock())
}

/// 입력이 끝나면(EOF) 종료로 처리한다.
pub fn main_menu_from(
    tr: &LocaleView<'_>,
    input: &mut impl BufRead,
) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MENU_TITLE,
        keys::MENU_SIMULATOR,
        keys::MENU_FLAT_RATE,
        keys::MENU_DIAGNOSTIC,
        keys::MENU_LANGUAGE,
        keys::MENU_EXIT,
    ] {
        say(tr, &tr.t(key));
    }
    loop {
        let sel = match read_line_from(input, &tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(line) => line,
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                log::debug!("menu input closed");
                return Ok(MenuChoice::Exit);
            }
            Err(e) => return Err(e),
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Simulator),
            "2" => return Ok(MenuChoice::FlatRate),
            "3" => return Ok(MenuChoice::Diagnostic),
            "4" => return Ok(MenuChoice::Language),
            "0" => return Ok(MenuChoice::Exit),
            _ => say(tr, &tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 연금 추정 메뉴를 처리한다. 입력이 모자라면 계산하지 않고 안내만 한다.
pub fn handle_estimate(
    tr: &LocaleView<'_>,
    cfg: &Config,
    method: EstimateMethod,
) -> Result<(), AppError> {
    let (title, intro) = match method {
        EstimateMethod::RegimeBased => (keys::SIMULATOR_TITLE, keys::SIMULATOR_INTRO),
        EstimateMethod::FlatRate => (keys::FLAT_TITLE, keys::FLAT_INTRO),
    };
    say(tr, &format!("\n-- {} --", tr.t(title)));
    say(tr, &tr.t(intro));

    let form = PensionForm {
        current_age: read_line(&field_prompt(tr, keys::SIMULATOR_CURRENT_AGE))?,
        retirement_age: read_line(&field_prompt(tr, keys::SIMULATOR_RETIREMENT_AGE))?,
        contribution_years: read_line(&field_prompt(tr, keys::SIMULATOR_YEARS))?,
        average_salary: read_line(&field_prompt(tr, keys::SIMULATOR_SALARY))?,
        regime: parse_regime(&read_line(&tr.t(keys::REGIME_PROMPT))?),
    };
    match form.parse() {
        Ok(input) => {
            let estimator = pension::estimator_for(method, cfg);
            let result = estimator.estimate(&input);
            say(tr, "");
            say(tr, &report::render_estimate(&result, tr));
        }
        Err(err) => {
            log::debug!("estimate blocked: {err}");
            say(tr, &format!("{}: {}", tr.t(keys::ERROR_PREFIX), err.localized(tr)));
        }
    }
    Ok(())
}

/// 진단 메뉴를 처리한다.
pub fn handle_diagnostic(tr: &LocaleView<'_>, cfg: &Config) -> Result<(), AppError> {
    say(tr, &format!("\n-- {} --", tr.t(keys::DIAGNOSTIC_TITLE)));
    say(tr, &tr.t(keys::DIAGNOSTIC_INTRO));
    let age = read_u32(tr, &field_prompt(tr, keys::DIAGNOSTIC_AGE))?;
    let status = loop {
        match read_line(&tr.t(keys::DIAGNOSTIC_STATUS_PROMPT))?.trim() {
            "1" => break Status::Before,
            "2" => break Status::After,
            _ => say(tr, &tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let organization = loop {
        match parse_organization(&read_line(&tr.t(keys::DIAGNOSTIC_ORG_PROMPT))?) {
            Some(org) => break org,
            None => say(tr, &tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let years_worked = read_u32(tr, &field_prompt(tr, keys::DIAGNOSTIC_YEARS))?;
    let input = DiagnosticInput {
        age,
        status,
        organization,
        years_worked,
    };
    let diagnostic = pension::diagnose(&input, &cfg.diagnostic);
    say(tr, "");
    say(tr, &report::render_diagnostic(&diagnostic, tr));
    Ok(())
}

/// 언어를 전환한다. 실제로 바뀌면 true.
pub fn handle_language(localizer: &mut Localizer) -> Result<bool, AppError> {
    let tr = localizer.view();
    let choice = read_line(&tr.t(keys::PROMPT_LANGUAGE))?;
    let lang = match choice.trim() {
        "1" => Language::Fr,
        "2" => Language::Ar,
        _ => {
            say(&tr, &tr.t(keys::INVALID_SELECTION_RETRY));
            return Ok(false);
        }
    };
    let changed = localizer.set_language(lang);
    let tr = localizer.view();
    say(
        &tr,
        &format!("{} {}", tr.t(keys::SETTINGS_LANGUAGE_CHANGED), lang.native_name()),
    );
    Ok(changed)
}

/// `1`/`cnss` 형태의 제도 선택을 해석한다. 빈 입력은 미선택.
pub fn parse_regime(raw: &str) -> Option<Regime> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "a" | "cnss" => Some(Regime::Cnss),
        "2" | "b" | "cmr" => Some(Regime::Cmr),
        "3" | "c" | "rcar" => Some(Regime::Rcar),
        _ => None,
    }
}

pub fn parse_organization(raw: &str) -> Option<Organization> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "cnss" => Some(Organization::Cnss),
        "2" | "cmr" => Some(Organization::Cmr),
        "3" | "rcar" => Some(Organization::Rcar),
        "4" | "other" | "autre" => Some(Organization::Other),
        _ => None,
    }
}

fn field_prompt(tr: &LocaleView<'_>, key: &str) -> String {
    format!("{}: ", tr.t(key))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 한 줄을 읽는다. 입력이 끝났으면 `UnexpectedEof` 로 알린다.
fn read_line_from(input: &mut impl BufRead, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
    }
    Ok(buf)
}

fn read_u32(tr: &LocaleView<'_>, prompt: &str) -> Result<u32, AppError> {
    read_u32_from(tr, &mut io::stdin().lock(), prompt)
}

fn read_u32_from(
    tr: &LocaleView<'_>,
    input: &mut impl BufRead,
    prompt: &str,
) -> Result<u32, AppError> {
    loop {
        let line = read_line_from(input, prompt)?;
        match line.trim().parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => say(tr, &tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::TranslationTable;

    #[test]
    fn rtl_lines_are_right_aligned() {
        let out = align_line("مرحبا", Direction::Rtl, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("مرحبا"));
        assert_eq!(align_line("Bonjour", Direction::Ltr, 10), "Bonjour");
    }

    #[test]
    fn long_rtl_lines_are_untouched() {
        let line = "x".repeat(12);
        assert_eq!(align_line(&line, Direction::Rtl, 10), line);
    }

    fn view_fr() -> Localizer {
        Localizer::new(TranslationTable::built_in().unwrap(), Language::Fr)
    }

    #[test]
    fn closed_input_exits_menu() {
        let loc = view_fr();
        let mut empty = io::empty();
        assert_eq!(main_menu_from(&loc.view(), &mut empty).unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn menu_retries_until_valid_choice() {
        let loc = view_fr();
        let mut input = io::Cursor::new("9\n\n3\n");
        assert_eq!(main_menu_from(&loc.view(), &mut input).unwrap(), MenuChoice::Diagnostic);
    }

    #[test]
    fn closed_input_stops_number_prompt() {
        let loc = view_fr();
        let mut input = io::Cursor::new("abc\n");
        match read_u32_from(&loc.view(), &mut input, "> ") {
            Err(AppError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn regime_and_org_choices() {
        assert_eq!(parse_regime(" 2 "), Some(Regime::Cmr));
        assert_eq!(parse_regime("RCAR"), Some(Regime::Rcar));
        assert_eq!(parse_regime(""), None);
        assert_eq!(parse_organization("4"), Some(Organization::Other));
        assert_eq!(parse_organization("9"), None);
    }
}
