use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use guide_retraite::app::{self, AppError};
use guide_retraite::config;
use guide_retraite::i18n::{keys, Localizer};
use guide_retraite::pension::{
    self, report, DiagnosticInput, EstimateMethod, Organization, PensionForm, Regime, Status,
};
use guide_retraite::ui_cli;

/// 입력값 오류로 계산을 하지 못했을 때의 종료 코드.
const EXIT_INPUT: u8 = 2;

/// 모로코 은퇴 안내 (FR/AR) 명령행 도구.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 표시 언어 (fr, ar, auto)
    #[arg(short = 'L', long, global = true)]
    lang: Option<String>,

    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 월 연금을 추정한다
    Estimate {
        #[arg(long, value_enum, default_value_t = MethodArg::Regime)]
        method: MethodArg,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        retire_age: Option<String>,
        #[arg(long)]
        years: Option<String>,
        /// 월 평균 급여 [DH]
        #[arg(long)]
        salary: Option<String>,
        #[arg(long, value_enum)]
        regime: Option<RegimeArg>,
    },
    /// 상황별 안내 문구를 고른다
    Diagnose {
        #[arg(long)]
        age: u32,
        #[arg(long, value_enum)]
        status: StatusArg,
        #[arg(long, value_enum, default_value_t = OrgArg::Other)]
        org: OrgArg,
        #[arg(long)]
        years: u32,
    },
    /// 번역 키 하나를 조회한다
    Translate { key: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Regime,
    Flat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegimeArg {
    Cnss,
    Cmr,
    Rcar,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrgArg {
    Cnss,
    Cmr,
    Rcar,
    Other,
}

impl From<MethodArg> for EstimateMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Regime => EstimateMethod::RegimeBased,
            MethodArg::Flat => EstimateMethod::FlatRate,
        }
    }
}

impl From<RegimeArg> for Regime {
    fn from(r: RegimeArg) -> Self {
        match r {
            RegimeArg::Cnss => Regime::Cnss,
            RegimeArg::Cmr => Regime::Cmr,
            RegimeArg::Rcar => Regime::Rcar,
        }
    }
}

impl From<StatusArg> for Status {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Before => Status::Before,
            StatusArg::After => Status::After,
        }
    }
}

impl From<OrgArg> for Organization {
    fn from(o: OrgArg) -> Self {
        match o {
            OrgArg::Cnss => Organization::Cnss,
            OrgArg::Cmr => Organization::Cmr,
            OrgArg::Rcar => Organization::Rcar,
            OrgArg::Other => Organization::Other,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정과 언어를 정한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    app::init_logging();
    let cli = Cli::parse();
    match try_run(cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err}");
            eprintln!("Erreur / خطأ: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut cfg = config::load_or_default_at(&cli.config)?;
    let mut localizer = app::build_localizer(&cfg, cli.lang.as_deref())?;
    match cli.command {
        None => {
            app::run(&mut cfg, &mut localizer)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Estimate {
            method,
            age,
            retire_age,
            years,
            salary,
            regime,
        }) => {
            let form = PensionForm {
                current_age: age.unwrap_or_default(),
                retirement_age: retire_age.unwrap_or_default(),
                contribution_years: years.unwrap_or_default(),
                average_salary: salary.unwrap_or_default(),
                regime: regime.map(Regime::from),
            };
            Ok(run_estimate(&localizer, &cfg, method.into(), &form))
        }
        Some(Command::Diagnose {
            age,
            status,
            org,
            years,
        }) => {
            let input = DiagnosticInput {
                age,
                status: status.into(),
                organization: org.into(),
                years_worked: years,
            };
            let diagnostic = pension::diagnose(&input, &cfg.diagnostic);
            let tr = localizer.view();
            ui_cli::say(&tr, &report::render_diagnostic(&diagnostic, &tr));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Translate { key }) => {
            println!("{}", localizer.translate(&key));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_estimate(
    localizer: &Localizer,
    cfg: &config::Config,
    method: EstimateMethod,
    form: &PensionForm,
) -> ExitCode {
    let tr = localizer.view();
    match form.parse() {
        Ok(input) => {
            let result = pension::estimator_for(method, cfg).estimate(&input);
            ui_cli::say(&tr, &report::render_estimate(&result, &tr));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", tr.t(keys::ERROR_PREFIX), err.localized(&tr));
            ExitCode::from(EXIT_INPUT)
        }
    }
}
