//! Playwright browser automation
//!
//! Every case becomes one self-contained Node.js script: launch a browser,
//! open the target, fill the input, poll the output region, print a single
//! JSON verdict line. Case data is embedded as a JSON object, never spliced
//! into JavaScript source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::case::{Expectation, TestCase};
use crate::error::{E2eError, E2eResult};
use crate::target::TargetConfig;

/// Exercises one case against the target and reports what it saw
#[async_trait]
pub trait CaseDriver: Send + Sync {
    async fn exercise(&self, case: &TestCase) -> E2eResult<Verdict>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(Failure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Expected text never appeared, or forbidden text surfaced
    Assertion,
    /// The page left the target origin
    Navigation,
    /// The input control no longer holds the submitted text
    InputLost,
    /// Browser, element or process trouble
    Automation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Assertion => "assertion",
            FailureKind::Navigation => "navigation",
            FailureKind::InputLost => "input_lost",
            FailureKind::Automation => "automation",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,

    /// Window in which a positive case must surface its pattern
    pub timeout_ms: u64,

    /// Window during which a negative case must stay clean
    pub negative_timeout_ms: u64,

    pub navigation_timeout_ms: u64,

    /// Default timeout for locator actions such as `fill`
    pub action_timeout_ms: u64,

    pub poll_interval_ms: u64,

    /// Slack on top of the page budgets for launching and closing the browser
    pub launch_budget_ms: u64,

    /// Node executable
    pub node_binary: PathBuf,

    /// Directory holding the `playwright` package; defaults to `./node_modules`
    pub node_modules: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            timeout_ms: 15_000,
            negative_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            action_timeout_ms: 10_000,
            poll_interval_ms: 250,
            launch_budget_ms: 15_000,
            node_binary: PathBuf::from("node"),
            node_modules: None,
        }
    }
}

impl PlaywrightConfig {
    /// Window that applies to a case's expectation
    pub fn window_ms(&self, expectation: &Expectation) -> u64 {
        match expectation {
            Expectation::Matches(_) => self.timeout_ms,
            Expectation::NotMatches(_) => self.negative_timeout_ms,
        }
    }

    /// Hard limit for the whole node process of one case
    pub fn process_timeout(&self, expectation: &Expectation) -> Duration {
        Duration::from_millis(
            self.navigation_timeout_ms
                + self.action_timeout_ms
                + self.window_ms(expectation)
                + self.launch_budget_ms,
        )
    }
}

/// Values the script reads; serialized straight into the script body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptParams<'a> {
    id: &'a str,
    url: &'a str,
    origin: &'a str,
    browser: &'static str,
    headless: bool,
    input_selector: &'a str,
    output_selector: &'a str,
    input: &'a str,
    pattern: &'a str,
    positive: bool,
    timeout_ms: u64,
    navigation_timeout_ms: u64,
    action_timeout_ms: u64,
    poll_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ScriptVerdict {
    success: bool,
    #[serde(default)]
    kind: Option<FailureKind>,
    #[serde(default)]
    error: Option<String>,
}

const PARAMS_PLACEHOLDER: &str = "/*PARAMS*/";

const SCRIPT_TEMPLATE: &str = r#"
const { chromium, firefox, webkit } = require('playwright');

const params = /*PARAMS*/;

function verdict(v) {
  console.log(JSON.stringify(v));
}

function fail(kind, error) {
  verdict({ success: false, kind, error: `${params.id}: ${error}` });
}

function countMatches(text) {
  if (text === null) return 0;
  return (text.match(new RegExp(params.pattern, 'gu')) || []).length;
}

function onOrigin(url) {
  try {
    return new URL(url).origin === params.origin;
  } catch (e) {
    return false;
  }
}

async function readOutput(page) {
  return page.evaluate((sel) => {
    const el = document.querySelector(sel);
    return el ? el.innerText : null;
  }, params.outputSelector);
}

(async () => {
  const engine = { chromium, firefox, webkit }[params.browser];
  const browser = await engine.launch({ headless: params.headless });
  try {
    const context = await browser.newContext();
    const page = await context.newPage();
    page.setDefaultTimeout(params.actionTimeoutMs);

    await page.goto(params.url, { waitUntil: 'domcontentloaded', timeout: params.navigationTimeoutMs });

    const input = page.locator(params.inputSelector).first();
    await input.waitFor({ state: 'visible' });

    const before = await readOutput(page);
    if (before === null) {
      fail('automation', `output region '${params.outputSelector}' not found`);
      return;
    }
    const baseline = countMatches(before);

    await input.fill(params.input);

    const deadline = Date.now() + params.timeoutMs;

    if (params.positive) {
      for (;;) {
        if (countMatches(await readOutput(page)) > 0) {
          verdict({ success: true });
          return;
        }
        if (Date.now() >= deadline) {
          fail('assertion', `expected /${params.pattern}/ within ${params.timeoutMs} ms`);
          return;
        }
        await page.waitForTimeout(params.pollIntervalMs);
      }
    }

    let value = null;
    for (;;) {
      if (!onOrigin(page.url())) {
        fail('navigation', `left ${params.origin} for ${page.url()}`);
        return;
      }
      value = await input.inputValue();
      const surfaced = countMatches(await readOutput(page)) - baseline;
      if (surfaced > 0) {
        fail('assertion', `forbidden /${params.pattern}/ surfaced ${surfaced} time(s)`);
        return;
      }
      if (Date.now() >= deadline) break;
      await page.waitForTimeout(params.pollIntervalMs);
    }

    if (value !== params.input) {
      fail('input_lost', `input holds ${JSON.stringify(value)}`);
      return;
    }

    verdict({ success: true });
  } catch (error) {
    fail('automation', error.message);
  } finally {
    await browser.close();
  }
})().catch((error) => {
  fail('automation', error.message);
  process.exitCode = 1;
});
"#;

/// Playwright-backed driver
pub struct PlaywrightDriver {
    config: PlaywrightConfig,
    target: TargetConfig,
    origin: String,
}

impl PlaywrightDriver {
    pub fn new(config: PlaywrightConfig, target: TargetConfig) -> E2eResult<Self> {
        let origin = target.origin()?;
        Ok(Self {
            config,
            target,
            origin,
        })
    }

    fn node_path(&self) -> Option<PathBuf> {
        match &self.config.node_modules {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir()
                .ok()
                .map(|cwd| cwd.join("node_modules"))
                .filter(|dir| dir.is_dir()),
        }
    }

    fn node_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.node_binary);
        if let Some(path) = self.node_path() {
            cmd.env("NODE_PATH", path);
        }
        cmd
    }

    /// Check that node runs and can resolve the `playwright` package
    pub fn check_installed(&self) -> E2eResult<()> {
        let status = self
            .node_command()
            .args(["-e", "require.resolve('playwright')"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Render the script that exercises `case`
    pub fn build_script(&self, case: &TestCase) -> E2eResult<String> {
        let expectation = &case.expectation;
        let params = ScriptParams {
            id: &case.id,
            url: &self.target.url,
            origin: &self.origin,
            browser: self.config.browser.as_str(),
            headless: self.config.headless,
            input_selector: &self.target.input_selector,
            output_selector: &self.target.output_selector,
            input: &case.input,
            pattern: expectation.pattern().as_str(),
            positive: expectation.is_positive(),
            timeout_ms: self.config.window_ms(expectation),
            navigation_timeout_ms: self.config.navigation_timeout_ms,
            action_timeout_ms: self.config.action_timeout_ms,
            poll_interval_ms: self.config.poll_interval_ms,
        };

        let json = serde_json::to_string_pretty(&params)?;
        Ok(SCRIPT_TEMPLATE.replacen(PARAMS_PLACEHOLDER, &json, 1))
    }

    /// Run a rendered script and return its stdout
    async fn run_script(&self, case: &TestCase, script: &str) -> E2eResult<String> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join(format!("{}.js", sanitize(&case.id)));
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::from(self.node_command());
        cmd.arg(&script_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            E2eError::Playwright(format!(
                "failed to spawn {}: {}",
                self.config.node_binary.display(),
                e
            ))
        })?;

        let limit = self.config.process_timeout(&case.expectation);
        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| E2eError::Timeout(format!("{} after {} ms", case.id, limit.as_millis())))??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Script for {} exited with {}: {}", case.id, output.status, stderr.trim());
        }

        Ok(stdout)
    }
}

#[async_trait]
impl CaseDriver for PlaywrightDriver {
    async fn exercise(&self, case: &TestCase) -> E2eResult<Verdict> {
        let script = self.build_script(case)?;
        let stdout = self.run_script(case, &script).await?;
        parse_verdict(&stdout)
    }
}

/// Take the last JSON verdict line printed by the script
pub fn parse_verdict(stdout: &str) -> E2eResult<Verdict> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| E2eError::Playwright(format!("no verdict in output: {}", stdout.trim())))?;

    let raw: ScriptVerdict = serde_json::from_str(line)?;
    if raw.success {
        return Ok(Verdict::Pass);
    }

    Ok(Verdict::Fail(Failure::new(
        raw.kind.unwrap_or(FailureKind::Automation),
        raw.error.unwrap_or_else(|| "unknown error".to_string()),
    )))
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
