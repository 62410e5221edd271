use crate::components::{CalendarProvider, DemoCalendar, GoogleCalendar};
use crate::config::{Config, CREDS_DIRECTORY_ENV};
use crate::error::{config_error, CalendarResult, Error};
use crate::tui::model::{UPCOMING_LIMIT, UPCOMING_THRESHOLD};
use crate::tui::{render_static, Agenda, RenderContext, Theme, ViewState};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Where log output goes
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// The dashboard owns the terminal, so logs go to a file
    File(PathBuf),
}

/// Initialize logging with environment-based configuration
///
/// For [`LogTarget::File`] the returned guard must be kept alive for the
/// whole run; dropping it flushes and stops the writer thread.
pub fn init_logging(target: LogTarget) -> miette::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (result, guard) = match target {
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            (tracing::subscriber::set_global_default(subscriber), None)
        }
        LogTarget::File(path) => {
            let (writer, guard) = file_writer(&path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            (tracing::subscriber::set_global_default(subscriber), Some(guard))
        }
    };

    result.map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;
    Ok(guard)
}

/// Non-blocking writer appending to `path`
pub fn file_writer(path: &Path) -> CalendarResult<(NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| config_error(&format!("Invalid log file path: {}", path.display())))?;

    if !dir.is_dir() {
        return Err(config_error(&format!(
            "Cannot write log file {}: directory {} does not exist",
            path.display(),
            dir.display()
        )));
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| config_error(&format!("Cannot open log file {}: {}", path.display(), e)))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Resolve a theme name, listing the valid ones on failure
pub fn resolve_theme(name: &str) -> CalendarResult<Theme> {
    Theme::by_name(name).ok_or_else(|| {
        config_error(&format!(
            "Unknown theme: {}. Available: {}",
            name,
            Theme::names().join(", ")
        ))
    })
}

/// Hint printed when no credentials directory is configured
pub fn credentials_hint(config: &Config) -> Option<String> {
    if config.credentials_dir.is_some() {
        return None;
    }
    Some(format!(
        "Credentials directory not configured. Current working directory will be used.\n Set '{}' env variable to configure",
        CREDS_DIRECTORY_ENV
    ))
}

/// Build the calendar provider for this run
pub fn build_provider(config: &Config, demo: bool) -> CalendarResult<Arc<dyn CalendarProvider>> {
    if demo {
        info!("Using demo calendar");
        Ok(Arc::new(DemoCalendar::new(Local::now())?))
    } else {
        Ok(Arc::new(GoogleCalendar::new(config)))
    }
}

/// Fetch once and render without the event loop
///
/// Unlike the dashboard, a failing list does not hide the others: each
/// failure is logged and the last one is shown under the output.
pub async fn static_agenda(provider: &dyn CalendarProvider) -> (Agenda, Option<Error>) {
    let mut agenda = Agenda::default();
    let mut last_error = None;

    let (today, next) = tokio::join!(provider.fetch_today(), provider.fetch_next());

    match today {
        Ok(today) => agenda.today = today,
        Err(e) => {
            error!("Error fetching today's events: {}", e);
            last_error = Some(e);
        }
    }

    match next {
        Ok(next) => agenda.next = next,
        Err(e) => error!("Error fetching next event: {}", e),
    }

    if agenda.today.len() < UPCOMING_THRESHOLD {
        match provider.fetch_upcoming(UPCOMING_LIMIT, true).await {
            Ok(upcoming) => agenda.upcoming = upcoming,
            Err(e) => {
                error!("Error fetching upcoming events: {}", e);
                last_error = Some(e);
            }
        }
    }

    (agenda, last_error)
}

/// Static mode: print the agenda once
pub async fn print_static(provider: &dyn CalendarProvider, ctx: &RenderContext) {
    let (agenda, last_error) = static_agenda(provider).await;
    let now = Local::now();
    let mut state = ViewState::from_agenda(agenda, now);
    state.last_error = last_error;
    print!("{}", render_static(&state, ctx, now));
}
