use crate::config::Config;
use crate::i18n::{self, keys, I18nError, Localizer, LogSink, TranslationTable};
use crate::pension::EstimateMethod;
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 터미널 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// 언어팩 로드 오류
    #[error("언어팩 오류: {0}")]
    I18n(#[from] I18nError),
}

/// 로그 출력을 초기화한다. `RUST_LOG` 가 없으면 warn 이상만 출력한다.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    // 테스트 등에서 두 번 불려도 무시한다
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

/// 설정과 CLI 플래그로 번역기를 만든다.
pub fn build_localizer(config: &Config, cli_lang: Option<&str>) -> Result<Localizer, AppError> {
    let table = TranslationTable::load(config.language_pack_dir.as_deref())?;
    let lang = i18n::resolve_language(cli_lang, &config.language);
    log::info!("language resolved: {}", lang.as_code());
    let mut localizer = Localizer::new(table, lang);
    localizer.subscribe(Box::new(LogSink));
    Ok(localizer)
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, localizer: &mut Localizer) -> Result<(), AppError> {
    loop {
        match step(config, localizer) {
            Ok(true) => {}
            Ok(false) => break,
            // 입력이 닫히면(파이프 종료, Ctrl-D) 조용히 끝낸다
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                log::debug!("input closed, leaving menu loop");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// 메뉴 한 번을 처리한다. 종료를 고르면 false.
fn step(config: &mut Config, localizer: &mut Localizer) -> Result<bool, AppError> {
    match ui_cli::main_menu(&localizer.view())? {
        MenuChoice::Simulator => {
            ui_cli::handle_estimate(&localizer.view(), config, EstimateMethod::RegimeBased)?
        }
        MenuChoice::FlatRate => {
            ui_cli::handle_estimate(&localizer.view(), config, EstimateMethod::FlatRate)?
        }
        MenuChoice::Diagnostic => ui_cli::handle_diagnostic(&localizer.view(), config)?,
        MenuChoice::Language => {
            if ui_cli::handle_language(localizer)? {
                config.language = localizer.language().as_code().to_string();
                config.save()?;
            }
        }
        MenuChoice::Exit => {
            ui_cli::say(&localizer.view(), &localizer.translate(keys::APP_EXIT));
            return Ok(false);
        }
    }
    Ok(true)
}
