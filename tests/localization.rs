//! 언어 전환과 번역 조회 회귀 테스트.
use guide_retraite::i18n::{keys, Direction, Language, Localizer, SharedDocument, TranslationTable};
use guide_retraite::pension::{report, FlatRateEstimator, PensionEstimator, PensionInput, Regime};
use pretty_assertions::assert_eq;
use std::fs;

fn localizer(lang: Language) -> Localizer {
    Localizer::new(TranslationTable::built_in().unwrap(), lang)
}

#[test]
fn unknown_key_is_returned_verbatim_in_both_languages() {
    let mut loc = localizer(Language::Fr);
    assert_eq!(loc.translate("no.such.key"), "no.such.key");
    loc.set_language(Language::Ar);
    assert_eq!(loc.translate("no.such.key"), "no.such.key");
}

#[test]
fn missing_arabic_entry_does_not_fall_back_to_french() {
    let mut table = TranslationTable::default();
    table.insert(Language::Fr, "only.fr", "Bonjour");
    let mut loc = Localizer::new(table, Language::Fr);
    assert_eq!(loc.translate("only.fr"), "Bonjour");
    loc.set_language(Language::Ar);
    assert_eq!(loc.translate("only.fr"), "only.fr");
}

#[test]
fn switching_language_changes_labels_but_not_results() {
    let mut loc = localizer(Language::Fr);
    let input = PensionInput {
        current_age: 40,
        retirement_age: 60,
        contribution_years: 20,
        average_salary: 10_000.0,
        regime: Regime::Cmr,
    };
    let result = FlatRateEstimator::default().estimate(&input);
    let fr_rows = report::summary_rows(&result, &loc.view());
    loc.set_language(Language::Ar);
    let ar_rows = report::summary_rows(&result, &loc.view());

    assert_eq!(fr_rows.len(), ar_rows.len());
    for ((fr_label, fr_value), (ar_label, ar_value)) in fr_rows.iter().zip(&ar_rows) {
        assert_ne!(fr_label, ar_label);
        // 숫자 부분은 언어와 무관하다
        let digits = |s: &str| s.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
        assert_eq!(digits(fr_value), digits(ar_value));
    }
    assert!((result.monthly_pension - 5_000.0).abs() < 1e-9);
}

#[test]
fn arabic_is_right_to_left() {
    let doc = SharedDocument::default();
    let mut loc = localizer(Language::Fr);
    loc.subscribe(Box::new(doc.clone()));
    assert_eq!(doc.attributes().dir, Direction::Ltr);
    loc.set_language(Language::Ar);
    assert_eq!(doc.attributes().dir, Direction::Rtl);
    assert_eq!(loc.direction(), Direction::Rtl);
    loc.set_language(Language::Fr);
    assert_eq!(doc.attributes().lang, Language::Fr);
    assert_eq!(doc.attributes().dir.as_attr(), "ltr");
}

#[test]
fn built_in_titles_are_localized() {
    let mut loc = localizer(Language::Fr);
    assert_eq!(loc.translate(keys::APP_TITLE), "Guide Retraite Maroc");
    loc.set_language(Language::Ar);
    assert_ne!(loc.translate(keys::APP_TITLE), "Guide Retraite Maroc");
    assert_ne!(loc.translate(keys::APP_TITLE), keys::APP_TITLE);
}

#[test]
fn pack_directory_overrides_built_in_strings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("fr.toml"),
        "[general]\napp_title = \"Mon guide\"\n",
    )
    .unwrap();
    let table = TranslationTable::with_pack_dir(dir.path()).unwrap();
    let loc = Localizer::new(table, Language::Fr);
    assert_eq!(loc.translate(keys::APP_TITLE), "Mon guide");
    // 덮어쓰지 않은 키는 내장 문자열 그대로
    assert_eq!(loc.translate(keys::CURRENCY), "DH");
}

#[test]
fn broken_pack_falls_back_to_built_in() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ar.toml"), "[general\n").unwrap();
    let path = dir.path().to_string_lossy().to_string();
    assert!(TranslationTable::with_pack_dir(&path).is_err());
    let table = TranslationTable::load(Some(&path)).unwrap();
    assert!(table.get(Language::Ar, keys::APP_TITLE).is_some());
}
