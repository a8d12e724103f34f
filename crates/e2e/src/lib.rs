//! Singlish E2E Case Runner
//!
//! Drives a Singlish-to-Sinhala transliteration page through Playwright and
//! asserts on the text it renders:
//! - Declarative case tables (built-in or YAML)
//! - One generated Playwright script per case, run with `node`
//! - Positive cases: the output must come to match a pattern
//! - Negative cases: nothing forbidden may surface, the input must be kept
//!   and the page must stay on its origin
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Case Runner (Rust)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CaseRunner<D: CaseDriver>                                   │
//! │    ├── run(cases) -> SuiteResult                             │
//! │    └── write_results(suite) -> test-results/*.json           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver                                            │
//! │    ├── build_script(case) -> String                          │
//! │    └── exercise(case) -> Verdict                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestCase                                                    │
//! │    ├── id, name?, category, input                            │
//! │    └── expectation: matches | not_matches                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod case;
pub mod catalog;
pub mod config;
pub mod error;
pub mod playwright;
pub mod runner;
pub mod target;

pub use case::{CaseFilter, CaseSet, Category, Expectation, Pattern, TestCase};
pub use config::RunnerConfig;
pub use error::{E2eError, E2eResult};
pub use playwright::{CaseDriver, PlaywrightDriver, Verdict};
pub use runner::{CaseOutcome, CaseRunner, SuiteResult};
