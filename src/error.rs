use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(mycal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(mycal::config))]
    Config(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(mycal::auth),
        help("Authorize the app and place myCalAppToken.json in MYCAL_CREDENTIALS_DIRECTORY")
    )]
    Auth(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(mycal::google_calendar))]
    GoogleCalendar(String),

    #[error("Terminal error: {0}")]
    #[diagnostic(code(mycal::terminal))]
    Terminal(String),

    #[error(transparent)]
    #[diagnostic(code(mycal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(mycal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(mycal::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalendarResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create terminal errors
pub fn terminal_error(message: &str) -> Error {
    Error::Terminal(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
