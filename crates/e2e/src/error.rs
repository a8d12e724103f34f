//! Error types for the case runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm i -D playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Case parse error: {0}")]
    CaseParse(String),

    #[error("Duplicate case id: {0}")]
    DuplicateCase(String),

    #[error("Invalid pattern in case {id}: {reason}")]
    InvalidPattern { id: String, reason: String },

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Target {url} unreachable after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
