//! Case runner - fans cases out to the driver and aggregates the verdicts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::case::{Category, TestCase};
use crate::config::RunnerConfig;
use crate::error::E2eResult;
use crate::playwright::{CaseDriver, Failure, FailureKind, PlaywrightDriver, Verdict};

/// Result of one attempt of one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub attempt: u32,
    pub success: bool,
    pub duration_ms: u64,
    pub failure: Option<Failure>,
}

/// Result of running a set of cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    /// Distinct cases
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    /// Cases whose attempts disagreed
    pub unstable: Vec<String>,
    /// Every attempt, in table order
    pub results: Vec<CaseOutcome>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for this result
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Failed attempts
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Runs cases through a [`CaseDriver`]
pub struct CaseRunner<D> {
    driver: Arc<D>,
    workers: usize,
    repeat_each: u32,
    output_dir: PathBuf,
}

impl CaseRunner<PlaywrightDriver> {
    /// Runner backed by Playwright, configured from `config`
    pub fn from_config(config: &RunnerConfig) -> E2eResult<Self> {
        config.validate()?;
        let driver = PlaywrightDriver::new(config.playwright.clone(), config.target.clone())?;
        Ok(Self::new(driver)
            .with_workers(config.workers)
            .with_repeat_each(config.repeat_each)
            .with_output_dir(config.output_dir.clone()))
    }
}

impl<D: CaseDriver + 'static> CaseRunner<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver: Arc::new(driver),
            workers: 1,
            repeat_each: 1,
            output_dir: PathBuf::from("test-results"),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_repeat_each(mut self, repeat_each: u32) -> Self {
        self.repeat_each = repeat_each.max(1);
        self
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run every case `repeat_each` times with at most `workers` in flight
    pub async fn run(&self, cases: &[TestCase]) -> SuiteResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));

        info!(
            "Running {} case(s) x{} with {} worker(s)...",
            cases.len(),
            self.repeat_each,
            self.workers
        );

        let mut handles = Vec::with_capacity(cases.len() * self.repeat_each as usize);
        for case in cases {
            for attempt in 1..=self.repeat_each {
                let driver = Arc::clone(&self.driver);
                let semaphore = Arc::clone(&semaphore);
                let job = case.clone();
                let handle = tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            let failure = Failure::new(FailureKind::Automation, e.to_string());
                            return failed(&job, attempt, 0, failure);
                        }
                    };
                    execute(driver.as_ref(), &job, attempt).await
                });
                handles.push((case, attempt, handle));
            }
        }

        let mut results = Vec::with_capacity(handles.len());
        for (case, attempt, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("✗ {} - worker aborted: {}", case.id, e);
                    let failure = Failure::new(
                        FailureKind::Automation,
                        format!("{}: worker aborted: {}", case.id, e),
                    );
                    failed(case, attempt, 0, failure)
                }
            };
            results.push(outcome);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let suite = aggregate(started_at, duration_ms, results);

        info!("");
        info!(
            "Case Results: {} passed, {} failed, {} unstable ({} ms)",
            suite.passed,
            suite.failed,
            suite.unstable.len(),
            duration_ms
        );

        suite
    }

    /// Write the suite result as pretty JSON
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("case-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

async fn execute<D: CaseDriver + ?Sized>(driver: &D, case: &TestCase, attempt: u32) -> CaseOutcome {
    let start = Instant::now();
    debug!("Running case: {} (attempt {})", case.id, attempt);

    let verdict = driver.exercise(case).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match verdict {
        Ok(Verdict::Pass) => {
            info!("✓ {} ({} ms)", case.title(), duration_ms);
            CaseOutcome {
                id: case.id.clone(),
                title: case.title(),
                category: case.category,
                attempt,
                success: true,
                duration_ms,
                failure: None,
            }
        }
        Ok(Verdict::Fail(failure)) => {
            error!("✗ {} - {}", case.title(), failure);
            failed(case, attempt, duration_ms, failure)
        }
        Err(e) => {
            error!("✗ {} - {}", case.title(), e);
            failed(
                case,
                attempt,
                duration_ms,
                Failure::new(FailureKind::Automation, format!("{}: {}", case.id, e)),
            )
        }
    }
}

fn failed(case: &TestCase, attempt: u32, duration_ms: u64, failure: Failure) -> CaseOutcome {
    CaseOutcome {
        id: case.id.clone(),
        title: case.title(),
        category: case.category,
        attempt,
        success: false,
        duration_ms,
        failure: Some(failure),
    }
}

/// A case passes only when every attempt passed. Outcomes sharing an id are
/// counted once.
fn aggregate(
    started_at: DateTime<Utc>,
    duration_ms: u64,
    results: Vec<CaseOutcome>,
) -> SuiteResult {
    let mut by_case: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for outcome in &results {
        let entry = by_case.entry(outcome.id.as_str()).or_insert((false, false));
        if outcome.success {
            entry.0 = true;
        } else {
            entry.1 = true;
        }
    }

    let mut unstable = Vec::new();
    let mut seen = HashSet::new();
    let mut passed = 0;
    let mut failed = 0;
    for outcome in &results {
        if !seen.insert(outcome.id.as_str()) {
            continue;
        }
        let (any_pass, any_fail) = by_case[outcome.id.as_str()];
        if any_fail {
            failed += 1;
        } else {
            passed += 1;
        }
        if any_pass && any_fail {
            warn!("{} is unstable: attempts disagree", outcome.id);
            unstable.push(outcome.id.clone());
        }
    }

    SuiteResult {
        started_at,
        total: passed + failed,
        passed,
        failed,
        duration_ms,
        unstable,
        results,
    }
}
