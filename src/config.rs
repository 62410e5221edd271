use crate::error::{config_error, env_error, CalendarResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the credentials directory
pub const CREDS_DIRECTORY_ENV: &str = "MYCAL_CREDENTIALS_DIRECTORY";

/// OAuth client file inside the credentials directory
pub const CREDENTIALS_FILE: &str = "myCalAppCredentials.json";

/// OAuth token file inside the credentials directory
pub const TOKEN_FILE: &str = "myCalAppToken.json";

/// Optional overrides file inside the credentials directory
pub const CONFIG_FILE: &str = "mycal.toml";

/// Default auto-refresh window
pub const DEFAULT_REFRESH_SECS: u64 = 300;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding credentials and token, `None` means the working directory
    pub credentials_dir: Option<PathBuf>,
    /// Google Calendar ID to query
    pub calendar_id: String,
    /// Theme name used when `--theme` is not given
    pub theme: String,
    /// How old the displayed data may get before a tick triggers a fetch
    pub refresh_interval: Duration,
    /// Forced hyperlink support, `None` means auto-detect
    pub hyperlinks: Option<bool>,
    /// Name shown in the greeting
    pub user_name: String,
}

/// Values that may be overridden from `mycal.toml`
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    calendar_id: Option<String>,
    theme: Option<String>,
    refresh_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_dir: None,
            calendar_id: "primary".to_string(),
            theme: "default".to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            hyperlinks: None,
            user_name: "there".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and the optional config file
    pub fn load() -> CalendarResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let credentials_dir = env::var(CREDS_DIRECTORY_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let mut config = Config {
            credentials_dir,
            user_name: display_name(env::var("USER").ok().as_deref()),
            ..Default::default()
        };

        if let Ok(calendar_id) = env::var("MYCAL_CALENDAR_ID") {
            config.calendar_id = calendar_id;
        }

        if let Ok(theme) = env::var("MYCAL_THEME") {
            config.theme = theme;
        }

        if let Ok(secs) = env::var("MYCAL_REFRESH_SECS") {
            config.refresh_interval = secs
                .parse::<u64>()
                .ok()
                .and_then(refresh_interval)
                .ok_or_else(|| env_error("MYCAL_REFRESH_SECS must be a positive number of seconds"))?;
        }

        if let Ok(value) = env::var("MYCAL_HYPERLINKS") {
            config.hyperlinks = Some(parse_flag(&value)?);
        }

        let file = config.resolve(CONFIG_FILE);
        config.apply_file(&file)?;

        Ok(config)
    }

    /// Merge overrides from a TOML file, a missing file is not an error
    pub fn apply_file(&mut self, path: &Path) -> CalendarResult<()> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let overrides: FileOverrides = toml::from_str(&content)
            .map_err(|e| config_error(&format!("{}: {}", path.display(), e)))?;

        if let Some(calendar_id) = overrides.calendar_id {
            self.calendar_id = calendar_id;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(secs) = overrides.refresh_secs {
            self.refresh_interval = refresh_interval(secs).ok_or_else(|| {
                config_error(&format!(
                    "{}: refresh_secs must be greater than zero",
                    path.display()
                ))
            })?;
        }

        Ok(())
    }

    /// Full path to the OAuth client file
    pub fn credentials_path(&self) -> PathBuf {
        self.resolve(CREDENTIALS_FILE)
    }

    /// Full path to the OAuth token file
    pub fn token_path(&self) -> PathBuf {
        self.resolve(TOKEN_FILE)
    }

    /// Full path to the log file used while the dashboard owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.resolve("mycal.log")
    }

    /// Whether terminal hyperlinks should be emitted
    pub fn hyperlinks_enabled(&self) -> bool {
        self.hyperlinks.unwrap_or_else(terminal_supports_hyperlinks)
    }

    fn resolve(&self, file: &str) -> PathBuf {
        match &self.credentials_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Capitalise the login name for the greeting
pub fn display_name(user: Option<&str>) -> String {
    let mut chars = match user {
        Some(name) if !name.is_empty() => name.chars(),
        _ => return "there".to_string(),
    };
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "there".to_string(),
    }
}

/// A zero window would refresh on every tick
fn refresh_interval(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_flag(value: &str) -> CalendarResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(env_error("MYCAL_HYPERLINKS must be true or false")),
    }
}

fn terminal_supports_hyperlinks() -> bool {
    if env::var_os("WT_SESSION").is_some() || env::var_os("VTE_VERSION").is_some() {
        return true;
    }
    matches!(
        env::var("TERM_PROGRAM").as_deref(),
        Ok("iTerm.app") | Ok("WezTerm") | Ok("vscode") | Ok("ghostty") | Ok("Hyper")
    )
}
