//! The page under test - address, selectors and reachability preflight

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

pub const DEFAULT_TARGET_URL: &str = "https://www.swifttranslator.com/";

/// Where the cases are exercised
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Page opened for every case
    pub url: String,

    /// Selector of the primary text input; the first match is used
    pub input_selector: String,

    /// Selector of the region whose text is observed
    pub output_selector: String,

    /// Preflight attempts before the run is abandoned
    pub probe_attempts: usize,

    /// Per-request timeout for the preflight
    pub probe_timeout_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
            input_selector: "textarea".to_string(),
            output_selector: "body".to_string(),
            probe_attempts: 3,
            probe_timeout_ms: 10_000,
        }
    }
}

impl TargetConfig {
    pub fn parsed_url(&self) -> E2eResult<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| E2eError::InvalidConfig(format!("target url {}: {}", self.url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(E2eError::InvalidConfig(format!(
                "target url must be http(s), got {}",
                other
            ))),
        }
    }

    /// Origin the page must stay on, e.g. `https://www.swifttranslator.com`
    pub fn origin(&self) -> E2eResult<String> {
        Ok(self.parsed_url()?.origin().ascii_serialization())
    }

    /// Check that the target answers with a 2xx before any browser starts
    pub async fn probe(&self) -> E2eResult<()> {
        let url = self.parsed_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.probe_timeout_ms))
            .build()?;

        let attempts = self.probe_attempts.max(1);
        for attempt in 1..=attempts {
            match client.get(url.clone()).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Target is reachable at {}", url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Preflight {}/{} returned {}", attempt, attempts, resp.status());
                }
                Err(e) => {
                    warn!("Preflight {}/{} failed: {}", attempt, attempts, e);
                }
            }

            if attempt < attempts {
                sleep(Duration::from_millis(500 * attempt as u64)).await;
            }
        }

        Err(E2eError::TargetUnreachable {
            url: self.url.clone(),
            attempts,
        })
    }
}
