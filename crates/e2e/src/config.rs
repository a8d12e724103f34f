//! Runner configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{E2eError, E2eResult};
use crate::playwright::PlaywrightConfig;
use crate::target::TargetConfig;

/// Configuration for the case runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub target: TargetConfig,

    pub playwright: PlaywrightConfig,

    /// Cases run concurrently, each in its own browser
    pub workers: usize,

    /// Attempts per case; attempts that disagree mark the case unstable
    pub repeat_each: u32,

    /// Extra YAML case files
    pub cases_dir: Option<PathBuf>,

    /// Include the built-in case table
    pub builtin_cases: bool,

    /// Probe the target over HTTP before launching browsers
    pub preflight: bool,

    /// Output directory for the JSON report
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            playwright: PlaywrightConfig::default(),
            workers: 1,
            repeat_each: 1,
            cases_dir: None,
            builtin_cases: true,
            preflight: true,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a TOML file, or defaults when it does not exist
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.workers == 0 {
            return Err(E2eError::InvalidConfig("workers must be at least 1".to_string()));
        }
        if self.repeat_each == 0 {
            return Err(E2eError::InvalidConfig("repeat_each must be at least 1".to_string()));
        }
        if self.playwright.timeout_ms == 0 || self.playwright.negative_timeout_ms == 0 {
            return Err(E2eError::InvalidConfig("timeouts must be positive".to_string()));
        }
        if self.playwright.poll_interval_ms == 0 {
            return Err(E2eError::InvalidConfig("poll_interval_ms must be positive".to_string()));
        }
        if !self.builtin_cases && self.cases_dir.is_none() {
            return Err(E2eError::InvalidConfig(
                "no cases: built-in table disabled and no cases_dir given".to_string(),
            ));
        }
        self.target.origin()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playwright::Browser;

    #[test]
    fn test_defaults_are_valid() {
        RunnerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunnerConfig::from_toml(
            r#"
workers = 4

[target]
url = "http://127.0.0.1:4173/"

[playwright]
browser = "firefox"
timeout_ms = 20000
"#,
        )
        .unwrap();

        assert_eq!(config.workers, 4);
        assert_eq!(config.repeat_each, 1);
        assert_eq!(config.target.input_selector, "textarea");
        assert_eq!(config.playwright.browser, Browser::Firefox);
        assert_eq!(config.playwright.timeout_ms, 20_000);
        assert_eq!(config.playwright.negative_timeout_ms, 5_000);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            RunnerConfig::from_toml("workers = 0"),
            Err(E2eError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_no_case_source_rejected() {
        assert!(RunnerConfig::from_toml("builtin_cases = false").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.workers, 1);
    }
}
