use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "general.app_title";
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const CURRENCY: &str = "general.currency";
    pub const YEARS_UNIT: &str = "general.years_unit";
    pub const DISCLAIMER: &str = "general.disclaimer";

    pub const NAV_SIMULATOR: &str = "nav.simulator";
    pub const NAV_FLAT_RATE: &str = "nav.flat_rate";
    pub const NAV_DIAGNOSTIC: &str = "nav.diagnostic";
    pub const NAV_SETTINGS: &str = "nav.settings";

    pub const MENU_TITLE: &str = "menu.title";
    pub const MENU_SIMULATOR: &str = "menu.simulator";
    pub const MENU_FLAT_RATE: &str = "menu.flat_rate";
    pub const MENU_DIAGNOSTIC: &str = "menu.diagnostic";
    pub const MENU_LANGUAGE: &str = "menu.language";
    pub const MENU_EXIT: &str = "menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_LANGUAGE: &str = "prompt.language";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const SIMULATOR_TITLE: &str = "simulator.title";
    pub const SIMULATOR_INTRO: &str = "simulator.intro";
    pub const SIMULATOR_CURRENT_AGE: &str = "simulator.current_age";
    pub const SIMULATOR_RETIREMENT_AGE: &str = "simulator.retirement_age";
    pub const SIMULATOR_YEARS: &str = "simulator.years";
    pub const SIMULATOR_SALARY: &str = "simulator.salary";
    pub const SIMULATOR_REGIME: &str = "simulator.regime";
    pub const SIMULATOR_CALCULATE: &str = "simulator.calculate";
    pub const SIMULATOR_RESET: &str = "simulator.reset";

    pub const REGIME_CNSS: &str = "regime.cnss";
    pub const REGIME_CMR: &str = "regime.cmr";
    pub const REGIME_RCAR: &str = "regime.rcar";
    pub const REGIME_PROMPT: &str = "regime.prompt";

    pub const FLAT_TITLE: &str = "flat.title";
    pub const FLAT_INTRO: &str = "flat.intro";

    pub const METHOD_REGIME: &str = "method.regime";
    pub const METHOD_FLAT: &str = "method.flat";

    pub const FORMULA_THRESHOLD: &str = "formula.threshold";
    pub const FORMULA_CAPITAL: &str = "formula.capital";
    pub const FORMULA_FLAT: &str = "formula.flat";

    pub const RESULT_TITLE: &str = "result.title";
    pub const RESULT_MONTHLY: &str = "result.monthly";
    pub const RESULT_ANNUAL: &str = "result.annual";
    pub const RESULT_RATE: &str = "result.rate";
    pub const RESULT_PROJECTION: &str = "result.projection";
    pub const RESULT_BREAKDOWN: &str = "result.breakdown";
    pub const RESULT_FORMULA: &str = "result.formula";
    pub const RESULT_ADVISORIES: &str = "result.advisories";
    pub const RESULT_DISCLAIMER: &str = "result.disclaimer";
    pub const RESULT_EXPORT: &str = "result.export";
    pub const RESULT_EXPORTED: &str = "result.exported";

    pub const INPUT_MISSING: &str = "input.missing";
    pub const INPUT_INVALID: &str = "input.invalid";

    pub const ADVISORY_VERY_SHORT_CAREER: &str = "advisory.very_short_career";
    pub const ADVISORY_SHORT_CAREER: &str = "advisory.short_career";
    pub const ADVISORY_FULL_CAREER: &str = "advisory.full_career";
    pub const ADVISORY_INVALID_RETIREMENT_AGE: &str = "advisory.invalid_retirement_age";
    pub const ADVISORY_LOW_PENSION: &str = "advisory.low_pension";
    pub const ADVISORY_ABOVE_SALARY: &str = "advisory.above_salary";

    pub const DIAGNOSTIC_TITLE: &str = "diagnostic.title";
    pub const DIAGNOSTIC_INTRO: &str = "diagnostic.intro";
    pub const DIAGNOSTIC_AGE: &str = "diagnostic.age";
    pub const DIAGNOSTIC_STATUS: &str = "diagnostic.status";
    pub const DIAGNOSTIC_STATUS_BEFORE: &str = "diagnostic.status_before";
    pub const DIAGNOSTIC_STATUS_AFTER: &str = "diagnostic.status_after";
    pub const DIAGNOSTIC_STATUS_PROMPT: &str = "diagnostic.status_prompt";
    pub const DIAGNOSTIC_ORG: &str = "diagnostic.org";
    pub const DIAGNOSTIC_ORG_CNSS: &str = "diagnostic.org_cnss";
    pub const DIAGNOSTIC_ORG_CMR: &str = "diagnostic.org_cmr";
    pub const DIAGNOSTIC_ORG_RCAR: &str = "diagnostic.org_rcar";
    pub const DIAGNOSTIC_ORG_OTHER: &str = "diagnostic.org_other";
    pub const DIAGNOSTIC_ORG_PROMPT: &str = "diagnostic.org_prompt";
    pub const DIAGNOSTIC_YEARS: &str = "diagnostic.years";
    pub const DIAGNOSTIC_SUBMIT: &str = "diagnostic.submit";
    pub const DIAGNOSTIC_RESULT_TITLE: &str = "diagnostic.result_title";
    pub const DIAGNOSTIC_BEFORE_YOUNG: &str = "diagnostic.before_young";
    pub const DIAGNOSTIC_BEFORE_SOON: &str = "diagnostic.before_soon";
    pub const DIAGNOSTIC_AFTER: &str = "diagnostic.after";
    pub const DIAGNOSTIC_LOW_YEARS: &str = "diagnostic.low_years";
    pub const DIAGNOSTIC_GOOD_YEARS: &str = "diagnostic.good_years";
    pub const DIAGNOSTIC_CONTACT_ORG: &str = "diagnostic.contact_org";
    pub const DIAGNOSTIC_CONTACT_RESOURCES: &str = "diagnostic.contact_resources";

    pub const SETTINGS_TITLE: &str = "settings.title";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_LANG_AUTO: &str = "settings.lang_auto";
    pub const SETTINGS_SAVE: &str = "settings.save";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_LANGUAGE_CHANGED: &str = "settings.language_changed";
}

/// 지원 언어. 프랑스어가 기본, 아랍어가 보조 언어다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Fr, Language::Ar];

    /// `fr`, `fr-MA`, `ar_MA.UTF-8` 형태의 코드를 해석한다.
    pub fn from_code(code: &str) -> Option<Self> {
        let base = code
            .trim()
            .split(['.', '_', '-'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match base.as_str() {
            "fr" => Some(Language::Fr),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Language::Fr => Direction::Ltr,
            Language::Ar => Direction::Rtl,
        }
    }

    /// 해당 언어로 표기한 언어 이름.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::Ar => "العربية",
        }
    }
}

/// 텍스트 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_attr(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn is_rtl(&self) -> bool {
        *self == Direction::Rtl
    }
}

/// 언어팩 로드 오류.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("언어팩 파싱 오류 ({lang}): {source}")]
    Parse {
        lang: &'static str,
        #[source]
        source: toml::de::Error,
    },
    #[error("언어팩 읽기 오류 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 언어별 키 → 문자열 테이블. 시작 시 한 번 구성하고 이후에는 읽기만 한다.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    packs: HashMap<Language, HashMap<String, String>>,
}

impl TranslationTable {
    /// 바이너리에 내장된 언어팩으로 테이블을 만든다.
    pub fn built_in() -> Result<Self, I18nError> {
        let mut packs = HashMap::new();
        for lang in Language::ALL {
            let map = parse_toml_to_map(built_in_source(lang))
                .map_err(|source| I18nError::Parse { lang: lang.as_code(), source })?;
            packs.insert(lang, map);
        }
        Ok(Self { packs })
    }

    /// 내장 언어팩 위에 디렉터리의 `{code}.toml` 을 덮어쓴다.
    /// 파일이 없는 언어는 내장 문자열만 사용한다.
    pub fn with_pack_dir(dir: impl AsRef<Path>) -> Result<Self, I18nError> {
        let mut table = Self::built_in()?;
        for lang in Language::ALL {
            let path = dir.as_ref().join(format!("{}.toml", lang.as_code()));
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let overlay = parse_toml_to_map(&content)
                .map_err(|source| I18nError::Parse { lang: lang.as_code(), source })?;
            log::info!(
                "language pack overlay loaded: {} ({} keys)",
                path.display(),
                overlay.len()
            );
            table.packs.entry(lang).or_default().extend(overlay);
        }
        Ok(table)
    }

    /// 설정의 언어팩 디렉터리를 반영한다. 오버레이가 실패하면 내장 언어팩으로 돌아간다.
    pub fn load(pack_dir: Option<&str>) -> Result<Self, I18nError> {
        match pack_dir {
            Some(dir) => Self::with_pack_dir(dir).or_else(|err| {
                log::warn!("language pack overlay ignored: {err}");
                Self::built_in()
            }),
            None => Self::built_in(),
        }
    }

    /// 비어 있는 테이블에 문자열을 추가한다 (테스트, 임베딩용).
    pub fn insert(&mut self, lang: Language, key: &str, value: &str) {
        self.packs
            .entry(lang)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, lang: Language, key: &str) -> Option<&str> {
        self.packs.get(&lang)?.get(key).map(String::as_str)
    }

    pub fn len(&self, lang: Language) -> usize {
        self.packs.get(&lang).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.packs.values().all(HashMap::is_empty)
    }

    /// 한 언어에만 있는 키 목록 (언어팩 점검용).
    pub fn keys_missing_in(&self, lang: Language, reference: Language) -> Vec<String> {
        let Some(reference) = self.packs.get(&reference) else {
            return Vec::new();
        };
        let mut missing: Vec<String> = reference
            .keys()
            .filter(|k| self.get(lang, k).is_none())
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

/// 문서 전체에 적용되는 언어/방향 속성.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentAttributes {
    pub lang: Language,
    pub dir: Direction,
}

impl DocumentAttributes {
    pub fn for_language(lang: Language) -> Self {
        Self {
            lang,
            dir: lang.direction(),
        }
    }
}

/// 언어 전환 시 문서 속성을 받는 쪽.
pub trait DocumentSink {
    fn apply(&mut self, attrs: DocumentAttributes);
}

/// 속성 변경을 로그로만 남기는 sink.
#[derive(Debug, Default)]
pub struct LogSink;

impl DocumentSink for LogSink {
    fn apply(&mut self, attrs: DocumentAttributes) {
        log::info!(
            "document attributes: lang={} dir={}",
            attrs.lang.as_code(),
            attrs.dir.as_attr()
        );
    }
}

/// 화면 쪽에서 현재 속성을 읽을 수 있게 공유하는 sink.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument(Rc<Cell<DocumentAttributes>>);

impl SharedDocument {
    pub fn attributes(&self) -> DocumentAttributes {
        self.0.get()
    }
}

impl DocumentSink for SharedDocument {
    fn apply(&mut self, attrs: DocumentAttributes) {
        self.0.set(attrs);
    }
}

/// 현재 언어의 유일한 소유자.
///
/// 화면 코드는 [`LocaleView`] 로 읽기만 하고, 언어 전환은 소유자를 통해서만 한다.
/// 전환 시 구독 중인 [`DocumentSink`] 들에 새 속성을 전달한다.
pub struct Localizer {
    table: TranslationTable,
    language: Language,
    sinks: Vec<Box<dyn DocumentSink>>,
}

impl Localizer {
    pub fn new(table: TranslationTable, language: Language) -> Self {
        Self {
            table,
            language,
            sinks: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    pub fn attributes(&self) -> DocumentAttributes {
        DocumentAttributes::for_language(self.language)
    }

    /// 키를 조회한다. 현재 언어에 없으면 키 자체를 돌려준다 (다른 언어로 폴백하지 않음).
    pub fn translate(&self, key: &str) -> String {
        self.view().t(key)
    }

    /// sink 를 등록하고 현재 속성을 즉시 전달한다.
    pub fn subscribe(&mut self, mut sink: Box<dyn DocumentSink>) {
        sink.apply(self.attributes());
        self.sinks.push(sink);
    }

    /// 언어를 바꾼다. 실제로 바뀐 경우에만 sink 에 전달하고 true 를 돌려준다.
    pub fn set_language(&mut self, lang: Language) -> bool {
        if lang == self.language {
            return false;
        }
        self.language = lang;
        log::info!("language switched to {}", lang.as_code());
        let attrs = self.attributes();
        for sink in &mut self.sinks {
            sink.apply(attrs);
        }
        true
    }

    pub fn view(&self) -> LocaleView<'_> {
        LocaleView {
            table: &self.table,
            language: self.language,
        }
    }
}

/// 화면 코드에 넘기는 읽기 전용 번역 컨텍스트.
#[derive(Debug, Clone, Copy)]
pub struct LocaleView<'a> {
    table: &'a TranslationTable,
    language: Language,
}

impl LocaleView<'_> {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    /// 번역을 가져온다. 없는 키는 그대로 노출된다.
    pub fn t(&self, key: &str) -> String {
        self.table
            .get(self.language, key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// `{name}` 자리표시자를 값으로 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: &str) -> Language {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| normalize_lang(config_lang))
        .or_else(detect_system_language)
        .unwrap_or_default()
}

fn normalize_lang(code: &str) -> Option<Language> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other => {
            let lang = Language::from_code(other);
            if lang.is_none() {
                log::warn!("unsupported language code '{other}', falling back");
            }
            lang
        }
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<Language> {
    if let Some(lang) = get_locale().as_deref().and_then(Language::from_code) {
        return Some(lang);
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(lang) = Language::from_code(&value) {
                return Some(lang);
            }
        }
    }
    None
}

fn built_in_source(lang: Language) -> &'static str {
    match lang {
        Language::Fr => include_str!("../locales/fr.toml"),
        Language::Ar => include_str!("../locales/ar.toml"),
    }
}

/// TOML 언어팩을 평탄한 맵으로 바꾼다. 중첩 테이블은 점으로 이어 붙인다.
fn parse_toml_to_map(src: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let table: toml::Table = toml::from_str(src)?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in &table {
        walk(k, v, &mut map);
    }
    Ok(map)
}
