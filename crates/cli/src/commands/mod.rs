//! CLI Commands

pub mod check;
pub mod list;
pub mod run;
pub mod script;

use anyhow::Context;
use clap::Args;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use singlish_e2e::playwright::Browser;
use singlish_e2e::{CaseFilter, CaseSet, Category, RunnerConfig, TestCase};

/// Which cases to take
#[derive(Args, Debug, Default)]
pub struct CaseArgs {
    /// Directory of extra YAML case files
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// Leave out the built-in case table
    #[arg(long)]
    pub no_builtin: bool,

    /// Only this case id (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Only this category (ui, positive, negative)
    #[arg(long)]
    pub category: Option<Category>,

    /// Only cases whose id or name matches this regex
    #[arg(long)]
    pub grep: Option<String>,
}

/// Where and how the page is opened
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Address of the page under test
    #[arg(long, env = "SINGLISH_E2E_TARGET_URL")]
    pub target_url: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Window for positive cases, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Window for negative cases, in milliseconds
    #[arg(long)]
    pub negative_timeout_ms: Option<u64>,
}

impl CaseArgs {
    fn apply(&self, config: &mut RunnerConfig) {
        if let Some(dir) = &self.cases {
            config.cases_dir = Some(dir.clone());
        }
        if self.no_builtin {
            config.builtin_cases = false;
        }
    }

    fn filter(&self) -> anyhow::Result<CaseFilter> {
        let grep = self
            .grep
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --grep pattern")?;

        Ok(CaseFilter {
            ids: self.ids.clone(),
            category: self.category,
            grep,
        })
    }
}

impl TargetArgs {
    fn apply(&self, config: &mut RunnerConfig) {
        if let Some(url) = &self.target_url {
            config.target.url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.playwright.browser = browser;
        }
        if self.headed {
            config.playwright.headless = false;
        }
        if let Some(ms) = self.timeout_ms {
            config.playwright.timeout_ms = ms;
        }
        if let Some(ms) = self.negative_timeout_ms {
            config.playwright.negative_timeout_ms = ms;
        }
    }
}

/// Load the config file and overlay command-line flags
pub fn load_config(
    path: &Path,
    cases: &CaseArgs,
    target: &TargetArgs,
) -> anyhow::Result<RunnerConfig> {
    let mut config = RunnerConfig::load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    cases.apply(&mut config);
    target.apply(&mut config);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Build the case set from the config and apply the selection flags
pub fn select_cases(config: &RunnerConfig, args: &CaseArgs) -> anyhow::Result<Vec<TestCase>> {
    let mut set = if config.builtin_cases {
        CaseSet::builtin()?
    } else {
        CaseSet::default()
    };

    if let Some(dir) = &config.cases_dir {
        let extra = CaseSet::load_dir(dir)
            .with_context(|| format!("loading cases from {}", dir.display()))?;
        set.extend(extra)?;
    }

    Ok(set.select(&args.filter()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = RunnerConfig::default();
        let target = TargetArgs {
            target_url: Some("http://127.0.0.1:4173/".to_string()),
            browser: Some(Browser::Webkit),
            headed: true,
            timeout_ms: Some(1_000),
            negative_timeout_ms: None,
        };
        target.apply(&mut config);

        assert_eq!(config.target.url, "http://127.0.0.1:4173/");
        assert_eq!(config.playwright.browser, Browser::Webkit);
        assert!(!config.playwright.headless);
        assert_eq!(config.playwright.timeout_ms, 1_000);
        assert_eq!(config.playwright.negative_timeout_ms, 5_000);
    }

    #[test]
    fn test_select_by_category_and_grep() {
        let config = RunnerConfig::default();
        let args = CaseArgs {
            category: Some(Category::NegativeFunctional),
            grep: Some("Emoji|Slang".to_string()),
            ..Default::default()
        };
        let cases = select_cases(&config, &args).unwrap();
        let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Neg_Fun_0006", "Neg_Fun_0009"]);
    }

    #[test]
    fn test_bad_grep_is_an_error() {
        let args = CaseArgs {
            grep: Some("(".to_string()),
            ..Default::default()
        };
        assert!(select_cases(&RunnerConfig::default(), &args).is_err());
    }
}
