#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use guide_retraite::{
    app, config,
    i18n::{self, keys, Direction, Language, LocaleView, Localizer, SharedDocument},
    pension::{
        self, report, DiagnosticInput, DiagnosticReport, EstimateMethod, InputError, Organization,
        PensionForm, PensionResult, Regime, Status,
    },
};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path};

fn main() -> Result<(), eframe::Error> {
    app::init_logging();
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/fr/ar)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let app_cfg = config::load_or_default().unwrap_or_else(|e| {
        log::warn!("config load failed, using defaults: {e}");
        config::Config::default()
    });
    let localizer = match app::build_localizer(&app_cfg, cli_lang.as_deref()) {
        Ok(l) => l,
        Err(e) => {
            log::error!("{e}");
            return Ok(());
        }
    };
    let title = localizer.translate(keys::APP_TITLE);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([960.0, 680.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                log::warn!("font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg, localizer))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["assets/icon.png", "icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 아랍 문자를 포함한 폰트를 기본 폰트 뒤에 대체 폰트로 등록한다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .push(font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 아랍어 표시용 폰트를 찾는다.
/// 1) assets/fonts 아래 Noto 아랍 폰트
/// 2) 리눅스/맥/윈도우 시스템 폰트
/// 3) 모두 실패 시 Err 를 반환하고 기본 폰트를 유지한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<std::path::PathBuf> = [
        "assets/fonts/NotoNaskhArabic-Regular.ttf",
        "assets/fonts/NotoSansArabic-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
        "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ]
    .iter()
    .map(std::path::PathBuf::from)
    .collect();
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["arial.ttf", "tahoma.ttf", "segoeui.ttf"] {
            candidates.push(fonts.join(cand));
        }
    }

    for p in candidates.iter().filter(|p| p.exists()) {
        let bytes =
            fs::read(p).map_err(|e| format!("failed to read font ({}): {e}", p.display()))?;
        apply_font_bytes(ctx, bytes, "arabic_font");
        log::info!("arabic font loaded from {}", p.display());
        return Ok(());
    }
    Err("no Arabic-capable font found; Arabic text may not render".into())
}

/// 방향에 맞는 세로 배치. RTL 이면 오른쪽 정렬.
fn content_layout(dir: Direction) -> egui::Layout {
    match dir {
        Direction::Ltr => egui::Layout::top_down(egui::Align::Min),
        Direction::Rtl => egui::Layout::top_down(egui::Align::Max),
    }
}

/// 방향에 맞는 가로 배치. RTL 이면 오른쪽부터 쌓는다.
fn row_layout(dir: Direction) -> egui::Layout {
    match dir {
        Direction::Ltr => egui::Layout::left_to_right(egui::Align::Center),
        Direction::Rtl => egui::Layout::right_to_left(egui::Align::Center),
    }
}

/// 라벨과 값을 읽기 방향 순서로 돌려준다.
fn ordered_pair<'a>(dir: Direction, label: &'a str, value: &'a str) -> (&'a str, &'a str) {
    match dir {
        Direction::Ltr => (label, value),
        Direction::Rtl => (value, label),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Simulator,
    FlatRate,
    Diagnostic,
    Settings,
}

/// 추정 탭 하나의 상태. 결과는 언어와 무관한 값만 저장한다.
#[derive(Debug, Default)]
struct EstimatePanel {
    form: PensionForm,
    outcome: Option<Result<PensionResult, InputError>>,
    export_status: Option<String>,
}

impl EstimatePanel {
    fn submit(&mut self, method: EstimateMethod, cfg: &config::Config) {
        self.export_status = None;
        self.outcome = Some(
            self.form
                .parse()
                .map(|input| pension::estimator_for(method, cfg).estimate(&input)),
        );
    }

    fn reset(&mut self) {
        self.form.clear();
        self.outcome = None;
        self.export_status = None;
    }
}

struct GuiApp {
    config: config::Config,
    localizer: Localizer,
    document: SharedDocument,
    tab: Tab,
    simulator: EstimatePanel,
    flat: EstimatePanel,
    // 진단
    diag_age: u32,
    diag_status: Status,
    diag_org: Organization,
    diag_years: u32,
    diag_report: Option<DiagnosticReport>,
    settings_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, mut localizer: Localizer) -> Self {
        let document = SharedDocument::default();
        localizer.subscribe(Box::new(document.clone()));
        log::info!(
            "GUI language resolved: {}",
            localizer.language().as_code()
        );
        Self {
            config,
            localizer,
            document,
            tab: Tab::Simulator,
            simulator: EstimatePanel::default(),
            flat: EstimatePanel::default(),
            diag_age: 40,
            diag_status: Status::Before,
            diag_org: Organization::Cnss,
            diag_years: 10,
            diag_report: None,
            settings_status: None,
        }
    }

    fn direction(&self) -> Direction {
        self.document.attributes().dir
    }

    /// 설정된 언어 선택. `auto` 이면 None.
    fn language_choice(&self) -> Option<Language> {
        Language::from_code(&self.config.language)
    }

    /// 언어를 고른다. None 은 `auto` (CLI 플래그 없이 시스템 로케일로 결정).
    fn choose_language(&mut self, choice: Option<Language>) {
        let lang = match choice {
            Some(lang) => {
                self.config.language = lang.as_code().to_string();
                lang
            }
            None => {
                self.config.language = "auto".to_string();
                i18n::resolve_language(None, &self.config.language)
            }
        };
        self.localizer.set_language(lang);
        self.settings_status = None;
    }

    fn ui_nav(&mut self, ui: &mut egui::Ui) {
        let tr = self.localizer.view();
        ui.vertical_centered(|ui| {
            ui.heading(tr.t(keys::APP_TITLE));
            ui.add_space(8.0);
        });
        let mut next = None;
        for (tab, key) in [
            (Tab::Simulator, keys::NAV_SIMULATOR),
            (Tab::FlatRate, keys::NAV_FLAT_RATE),
            (Tab::Diagnostic, keys::NAV_DIAGNOSTIC),
            (Tab::Settings, keys::NAV_SETTINGS),
        ] {
            let selected = self.tab == tab;
            let button = egui::Button::new(tr.t(key))
                .fill(if selected {
                    ui.visuals().selection.bg_fill
                } else {
                    ui.visuals().extreme_bg_color
                })
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                next = Some(tab);
            }
            ui.add_space(4.0);
        }
        ui.separator();
        let other = match self.localizer.language() {
            Language::Fr => Language::Ar,
            Language::Ar => Language::Fr,
        };
        let mut switch = false;
        ui.vertical_centered(|ui| {
            switch = ui.button(other.native_name()).clicked();
        });
        if let Some(tab) = next {
            self.tab = tab;
        }
        if switch {
            self.choose_language(Some(other));
        }
    }

    fn ui_estimate(&mut self, ui: &mut egui::Ui, method: EstimateMethod) {
        let dir = self.direction();
        let tr = self.localizer.view();
        let (title, intro) = match method {
            EstimateMethod::RegimeBased => (keys::SIMULATOR_TITLE, keys::SIMULATOR_INTRO),
            EstimateMethod::FlatRate => (keys::FLAT_TITLE, keys::FLAT_INTRO),
        };
        let panel = match method {
            EstimateMethod::RegimeBased => &mut self.simulator,
            EstimateMethod::FlatRate => &mut self.flat,
        };
        ui.heading(tr.t(title));
        ui.add(egui::Label::new(tr.t(intro)).wrap(true));
        ui.add_space(6.0);
        ui.add(egui::ProgressBar::new(panel.form.filled_fraction()).show_percentage());
        ui.add_space(6.0);

        let id = match method {
            EstimateMethod::RegimeBased => "form_regime",
            EstimateMethod::FlatRate => "form_flat",
        };
        egui::Grid::new(id).num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            for (key, value) in [
                (keys::SIMULATOR_CURRENT_AGE, &mut panel.form.current_age),
                (keys::SIMULATOR_RETIREMENT_AGE, &mut panel.form.retirement_age),
                (keys::SIMULATOR_YEARS, &mut panel.form.contribution_years),
                (keys::SIMULATOR_SALARY, &mut panel.form.average_salary),
            ] {
                form_row(ui, dir, &tr.t(key), |ui| {
                    ui.add(egui::TextEdit::singleline(value).desired_width(160.0));
                });
            }
            let selected = panel
                .form
                .regime
                .map(|r| tr.t(r.label_key()))
                .unwrap_or_else(|| "-".to_string());
            form_row(ui, dir, &tr.t(keys::SIMULATOR_REGIME), |ui| {
                egui::ComboBox::from_id_source((id, "regime"))
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for r in Regime::ALL {
                            ui.selectable_value(&mut panel.form.regime, Some(r), tr.t(r.label_key()));
                        }
                    });
            });
        });

        ui.add_space(8.0);
        let mut submit = false;
        let mut reset = false;
        ui.with_layout(row_layout(dir), |ui| {
            submit = ui.button(tr.t(keys::SIMULATOR_CALCULATE)).clicked();
            reset = ui.button(tr.t(keys::SIMULATOR_RESET)).clicked();
        });
        if submit {
            panel.submit(method, &self.config);
        }
        if reset {
            panel.reset();
        }

        match &panel.outcome {
            None => {}
            Some(Err(err)) => {
                ui.add_space(8.0);
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("{}: {}", tr.t(keys::ERROR_PREFIX), err.localized(&tr)),
                );
            }
            Some(Ok(result)) => {
                ui.add_space(10.0);
                ui.separator();
                result_ui(ui, dir, &tr, result, id);
                ui.add_space(6.0);
                if ui.button(tr.t(keys::RESULT_EXPORT)).clicked() {
                    panel.export_status = export_report(result, &tr);
                }
                if let Some(msg) = &panel.export_status {
                    ui.label(msg);
                }
            }
        }
    }

    fn ui_diagnostic(&mut self, ui: &mut egui::Ui) {
        let dir = self.direction();
        let tr = self.localizer.view();
        ui.heading(tr.t(keys::DIAGNOSTIC_TITLE));
        ui.add(egui::Label::new(tr.t(keys::DIAGNOSTIC_INTRO)).wrap(true));
        ui.add_space(8.0);

        egui::Grid::new("diag_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            form_row(ui, dir, &tr.t(keys::DIAGNOSTIC_AGE), |ui| {
                ui.add(egui::DragValue::new(&mut self.diag_age).clamp_range(16..=110));
            });
            form_row(ui, dir, &tr.t(keys::DIAGNOSTIC_STATUS), |ui| {
                for s in [Status::Before, Status::After] {
                    ui.radio_value(&mut self.diag_status, s, tr.t(s.label_key()));
                }
            });
            form_row(ui, dir, &tr.t(keys::DIAGNOSTIC_ORG), |ui| {
                egui::ComboBox::from_id_source("diag_org")
                    .selected_text(tr.t(self.diag_org.label_key()))
                    .show_ui(ui, |ui| {
                        for org in Organization::ALL {
                            ui.selectable_value(&mut self.diag_org, org, tr.t(org.label_key()));
                        }
                    });
            });
            form_row(ui, dir, &tr.t(keys::DIAGNOSTIC_YEARS), |ui| {
                ui.add(egui::DragValue::new(&mut self.diag_years).clamp_range(0..=60));
            });
        });

        ui.add_space(8.0);
        if ui.button(tr.t(keys::DIAGNOSTIC_SUBMIT)).clicked() {
            let input = DiagnosticInput {
                age: self.diag_age,
                status: self.diag_status,
                organization: self.diag_org,
                years_worked: self.diag_years,
            };
            self.diag_report = Some(pension::diagnose(&input, &self.config.diagnostic));
        }
        if let Some(diag) = &self.diag_report {
            ui.add_space(10.0);
            ui.separator();
            ui.heading(tr.t(keys::DIAGNOSTIC_RESULT_TITLE));
            for line in diag.render(&tr) {
                ui.add(egui::Label::new(format!("• {line}")).wrap(true));
                ui.add_space(4.0);
            }
        }
    }

    fn ui_settings(&mut self, ui: &mut egui::Ui) {
        let tr = self.localizer.view();
        ui.heading(tr.t(keys::SETTINGS_TITLE));
        ui.add_space(8.0);
        let current = self.language_choice();
        let mut picked = current;
        ui.label(tr.t(keys::SETTINGS_LANGUAGE));
        ui.radio_value(&mut picked, None, tr.t(keys::SETTINGS_LANG_AUTO));
        for lang in Language::ALL {
            ui.radio_value(&mut picked, Some(lang), lang.native_name());
        }
        ui.add_space(8.0);
        let save = ui.button(tr.t(keys::SETTINGS_SAVE)).clicked();
        if let Some(msg) = &self.settings_status {
            ui.label(msg);
        }
        let saved_text = tr.t(keys::SETTINGS_SAVED);
        let error_prefix = tr.t(keys::ERROR_PREFIX);
        if picked != current {
            self.choose_language(picked);
        }
        if save {
            self.settings_status = Some(match self.config.save() {
                Ok(()) => saved_text,
                Err(e) => {
                    log::error!("config save failed: {e}");
                    format!("{error_prefix}: {e}")
                }
            });
        }
    }
}

/// 방향에 맞춰 라벨/입력 칸 순서를 바꾼 격자 한 줄.
fn form_row(ui: &mut egui::Ui, dir: Direction, label: &str, add: impl FnOnce(&mut egui::Ui)) {
    match dir {
        Direction::Ltr => {
            ui.label(label);
            add(ui);
        }
        Direction::Rtl => {
            add(ui);
            ui.label(label);
        }
    }
    ui.end_row();
}

fn result_ui(
    ui: &mut egui::Ui,
    dir: Direction,
    tr: &LocaleView<'_>,
    result: &PensionResult,
    id: &str,
) {
    ui.heading(format!(
        "{} | {}",
        tr.t(keys::RESULT_TITLE),
        tr.t(result.method.label_key())
    ));
    egui::Grid::new((id, "summary")).num_columns(2).striped(true).show(ui, |ui| {
        for (label, value) in report::summary_rows(result, tr) {
            let (a, b) = ordered_pair(dir, &label, &value);
            ui.label(a);
            ui.strong(b);
            ui.end_row();
        }
    });
    ui.add_space(6.0);
    egui::CollapsingHeader::new(tr.t(keys::RESULT_BREAKDOWN))
        .id_source((id, "breakdown"))
        .default_open(false)
        .show(ui, |ui| {
            egui::Grid::new((id, "breakdown_grid")).num_columns(2).show(ui, |ui| {
                for (label, value) in report::breakdown_rows(result, tr) {
                    let (a, b) = ordered_pair(dir, &label, &value);
                    ui.label(a);
                    ui.label(b);
                    ui.end_row();
                }
            });
        });
    let advisories = report::advisory_lines(result, tr);
    if !advisories.is_empty() {
        ui.add_space(6.0);
        ui.strong(tr.t(keys::RESULT_ADVISORIES));
        for line in advisories {
            ui.add(egui::Label::new(format!("• {line}")).wrap(true));
        }
    }
    ui.add_space(6.0);
    ui.add(egui::Label::new(egui::RichText::new(tr.t(keys::RESULT_DISCLAIMER)).small()).wrap(true));
}

/// 보고서를 텍스트 파일로 저장한다. 취소하면 None.
fn export_report(result: &PensionResult, tr: &LocaleView<'_>) -> Option<String> {
    let path = FileDialog::new()
        .set_file_name("estimation_retraite.txt")
        .add_filter("Texte", &["txt"])
        .save_file()?;
    let text = report::render_estimate(result, tr);
    Some(match fs::write(&path, text) {
        Ok(()) => format!("{} {}", tr.t(keys::RESULT_EXPORTED), path.display()),
        Err(e) => {
            log::error!("report export failed: {e}");
            format!("{}: {e}", tr.t(keys::ERROR_PREFIX))
        }
    })
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let dir = self.direction();
        let disclaimer = self.localizer.translate(keys::DISCLAIMER);

        egui::TopBottomPanel::bottom("disclaimer").show(ctx, |ui| {
            ui.with_layout(content_layout(dir), |ui| {
                ui.small(disclaimer);
            });
        });

        // 네비게이션은 읽기 시작 방향에 둔다
        let nav = match dir {
            Direction::Ltr => egui::SidePanel::left("nav"),
            Direction::Rtl => egui::SidePanel::right("nav"),
        };
        nav.resizable(true)
            .min_width(160.0)
            .default_width(220.0)
            .show(ctx, |ui| {
                self.ui_nav(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.with_layout(content_layout(dir), |ui| match self.tab {
                        Tab::Simulator => self.ui_estimate(ui, EstimateMethod::RegimeBased),
                        Tab::FlatRate => self.ui_estimate(ui, EstimateMethod::FlatRate),
                        Tab::Diagnostic => self.ui_diagnostic(ui),
                        Tab::Settings => self.ui_settings(ui),
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guide_retraite::i18n::TranslationTable;

    fn gui(lang: Language) -> GuiApp {
        let table = TranslationTable::built_in().unwrap();
        GuiApp::new(config::Config::default(), Localizer::new(table, lang))
    }

    fn filled() -> PensionForm {
        PensionForm {
            current_age: "45".into(),
            retirement_age: "60".into(),
            contribution_years: "20".into(),
            average_salary: "10000".into(),
            regime: Some(Regime::Cnss),
        }
    }

    #[test]
    fn language_toggle_flips_direction() {
        let mut app = gui(Language::Fr);
        assert_eq!(app.direction(), Direction::Ltr);
        app.choose_language(Some(Language::Ar));
        assert_eq!(app.direction(), Direction::Rtl);
        assert_eq!(app.config.language, "ar");
    }

    #[test]
    fn auto_choice_restores_system_detection() {
        let mut app = gui(Language::Fr);
        app.choose_language(Some(Language::Ar));
        assert_eq!(app.language_choice(), Some(Language::Ar));
        app.choose_language(None);
        assert_eq!(app.config.language, "auto");
        assert_eq!(app.language_choice(), None);
        assert_eq!(
            app.localizer.language(),
            i18n::resolve_language(None, "auto")
        );
    }

    #[test]
    fn result_survives_language_switch() {
        let mut app = gui(Language::Fr);
        app.simulator.form = filled();
        let cfg = app.config.clone();
        app.simulator.submit(EstimateMethod::RegimeBased, &cfg);
        let before = app.simulator.outcome.clone();
        app.choose_language(Some(Language::Ar));
        assert_eq!(app.simulator.outcome, before);
        match before {
            Some(Ok(r)) => assert!((r.annual_pension - 5500.0).abs() < 1e-9),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn incomplete_form_blocks_estimate() {
        let mut panel = EstimatePanel::default();
        panel.form = filled();
        panel.form.average_salary.clear();
        panel.submit(EstimateMethod::FlatRate, &config::Config::default());
        assert!(matches!(panel.outcome, Some(Err(InputError::Missing(_)))));
        panel.reset();
        assert!(panel.outcome.is_none());
        assert_eq!(panel.form, PensionForm::default());
    }

    #[test]
    fn rtl_rows_swap_label_and_value() {
        assert_eq!(ordered_pair(Direction::Rtl, "a", "b"), ("b", "a"));
        assert_eq!(ordered_pair(Direction::Ltr, "a", "b"), ("a", "b"));
    }
}
