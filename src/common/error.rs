use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Invocation error: {0}")]
    Invocation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl HarnessError {
    /// Whether this error should stop the whole run rather than a single scenario.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarnessError::Setup(_) | HarnessError::ConfigError(_) | HarnessError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
