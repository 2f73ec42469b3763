mod logging;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::config::parse_stream_timeout;
use services::{
    ApiConfig, AppServices, AssessmentService, CalendarExportService, Clock, CreationService,
    LearningPathService, QuizService, StudySessionService,
};
use studysync_core::model::OnboardingVariant;
use tracing::info;
use ui::{App, UiApp, build_app_context};

use crate::logging::{DEFAULT_LOG_LEVEL, init_logging};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidOnboarding { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::InvalidOnboarding { raw } => {
                write!(f, "invalid --onboarding value: {raw} (expected simple or assessment)")
            }
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --stream-timeout-secs value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn onboarding(&self) -> OnboardingVariant {
        self.services.onboarding()
    }

    fn creation(&self) -> Arc<CreationService> {
        self.services.creation()
    }

    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn learning_paths(&self) -> Arc<LearningPathService> {
        self.services.learning_paths()
    }

    fn study_sessions(&self) -> Arc<StudySessionService> {
        self.services.study_sessions()
    }

    fn quizzes(&self) -> Arc<QuizService> {
        self.services.quizzes()
    }

    fn calendar(&self) -> Arc<CalendarExportService> {
        self.services.calendar()
    }
}

#[derive(Debug)]
struct Args {
    config: ApiConfig,
    log_level: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--onboarding <simple|assessment>]");
    eprintln!("                      [--stream-timeout-secs <n>] [--download-dir <dir>]");
    eprintln!("                      [--log-level <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8000/api");
    eprintln!("  --onboarding assessment");
    eprintln!("  --stream-timeout-secs 600   (0 waits forever)");
    eprintln!("  --download-dir <platform downloads folder>");
    eprintln!("  --log-level info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDYSYNC_API_URL, STUDYSYNC_ONBOARDING, STUDYSYNC_STREAM_TIMEOUT_SECS,");
    eprintln!("  STUDYSYNC_DOWNLOAD_DIR, STUDYSYNC_LOG, RUST_LOG");
}

impl Args {
    /// Apply command-line flags on top of the environment-derived defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        mut config: ApiConfig,
        mut log_level: String,
    ) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    config.base_url = value.trim().to_string();
                }
                "--onboarding" => {
                    let value = require_value(args, "--onboarding")?;
                    config.onboarding = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidOnboarding { raw: value.clone() })?;
                }
                "--stream-timeout-secs" => {
                    let value = require_value(args, "--stream-timeout-secs")?;
                    config.stream_timeout = parse_stream_timeout(&value)
                        .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                }
                "--download-dir" => {
                    let value = require_value(args, "--download-dir")?;
                    config.download_dir = Some(PathBuf::from(value));
                }
                "--log-level" => {
                    log_level = require_value(args, "--log-level")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { config, log_level })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let defaults = ApiConfig::from_env()?;
    let log_level =
        std::env::var("STUDYSYNC_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, defaults, log_level).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging(&parsed.log_level)?;
    info!(
        api_url = parsed.config.base_url.as_str(),
        onboarding = parsed.config.onboarding.as_str(),
        stream_timeout_secs = parsed.config.stream_timeout.map(|t| t.as_secs()),
        "starting StudySync"
    );

    let services = AppServices::http(&parsed.config, Clock::default())?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("StudySync")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
