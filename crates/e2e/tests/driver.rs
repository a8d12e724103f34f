//! Runs the generated case script under node against a stub `playwright`
//! package (tests/fixtures/node_modules). The stub page reacts to the filled
//! text, so each verdict the script can print is reached without a browser.

use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use singlish_e2e::case::CaseDef;
use singlish_e2e::catalog::SINHALA_LETTER;
use singlish_e2e::playwright::{FailureKind, PlaywrightConfig};
use singlish_e2e::target::TargetConfig;
use singlish_e2e::{CaseDriver, CaseRunner, CaseSet, PlaywrightDriver, TestCase, Verdict};

fn in_path(bin: &str) -> bool {
    Command::new("sh")
        .arg("-lc")
        .arg(format!("command -v {bin} >/dev/null 2>&1"))
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn stub_modules() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/node_modules")
}

fn config() -> PlaywrightConfig {
    PlaywrightConfig {
        timeout_ms: 500,
        negative_timeout_ms: 500,
        navigation_timeout_ms: 500,
        action_timeout_ms: 500,
        poll_interval_ms: 50,
        launch_budget_ms: 500,
        node_modules: Some(stub_modules()),
        ..Default::default()
    }
}

fn target(input_selector: &str) -> TargetConfig {
    TargetConfig {
        url: "http://stub.test/".to_string(),
        input_selector: input_selector.to_string(),
        ..Default::default()
    }
}

fn driver() -> PlaywrightDriver {
    PlaywrightDriver::new(config(), target("textarea")).unwrap()
}

fn case(def: CaseDef) -> TestCase {
    CaseSet::from_defs(vec![def]).unwrap().iter().next().unwrap().clone()
}

fn failure_kind(verdict: Verdict) -> FailureKind {
    match verdict {
        Verdict::Fail(failure) => failure.kind,
        Verdict::Pass => panic!("expected a failure verdict"),
    }
}

macro_rules! require_node {
    () => {
        if !in_path("node") {
            eprintln!("Skipping: node not available in PATH");
            return;
        }
    };
}

#[tokio::test]
async fn positive_passes_when_pattern_appears() {
    require_node!();
    let verdict = driver()
        .exercise(&case(CaseDef::positive("Pos_Fun_0002", "aayuboovan", "ආයුබෝවන්")))
        .await
        .unwrap();
    assert_eq!(verdict, Verdict::Pass);
}

#[tokio::test]
async fn positive_fails_when_window_expires() {
    require_node!();
    let verdict = driver()
        .exercise(&case(CaseDef::positive("Pos_X", "nothing happens", "ආයුබෝවන්")))
        .await
        .unwrap();
    match verdict {
        Verdict::Fail(failure) => {
            assert_eq!(failure.kind, FailureKind::Assertion);
            assert!(failure.message.starts_with("Pos_X:"), "{}", failure.message);
        }
        Verdict::Pass => panic!("expected assertion failure"),
    }
}

#[tokio::test]
async fn negative_ignores_text_already_on_page() {
    require_node!();
    // the stub body already holds one Sinhala letter before the fill
    let verdict = driver()
        .exercise(&case(CaseDef::negative("Neg_Fun_0001", "%%%%%#####@@@@@", SINHALA_LETTER)))
        .await
        .unwrap();
    assert_eq!(verdict, Verdict::Pass);
}

#[tokio::test]
async fn negative_fails_when_forbidden_text_surfaces() {
    require_node!();
    let verdict = driver()
        .exercise(&case(CaseDef::negative("Neg_X", "surface a letter", SINHALA_LETTER)))
        .await
        .unwrap();
    assert_eq!(failure_kind(verdict), FailureKind::Assertion);
}

#[tokio::test]
async fn negative_fails_when_page_leaves_origin() {
    require_node!();
    let verdict = driver()
        .exercise(&case(CaseDef::negative("Neg_X", "navigate away", SINHALA_LETTER)))
        .await
        .unwrap();
    assert_eq!(failure_kind(verdict), FailureKind::Navigation);
}

#[tokio::test]
async fn negative_fails_when_input_is_cleared() {
    require_node!();
    let verdict = driver()
        .exercise(&case(CaseDef::negative("Neg_X", "clear the box", SINHALA_LETTER)))
        .await
        .unwrap();
    assert_eq!(failure_kind(verdict), FailureKind::InputLost);
}

#[tokio::test]
async fn missing_input_control_is_automation_failure() {
    require_node!();
    let driver = PlaywrightDriver::new(config(), target("#missing")).unwrap();
    let verdict = driver
        .exercise(&case(CaseDef::negative("Neg_X", "%%%", SINHALA_LETTER)))
        .await
        .unwrap();
    assert_eq!(failure_kind(verdict), FailureKind::Automation);
}

#[tokio::test]
async fn hung_script_is_killed_and_reported() {
    require_node!();
    let cases = vec![
        case(CaseDef::negative("Neg_Hang", "hang forever", SINHALA_LETTER)),
        case(CaseDef::positive("Pos_Fun_0002", "aayuboovan", "ආයුබෝවන්")),
    ];
    let runner = CaseRunner::new(driver());

    let start = Instant::now();
    let suite = runner.run(&cases).await;
    assert!(start.elapsed() < Duration::from_secs(10));

    assert_eq!(suite.total, 2);
    assert_eq!(suite.passed, 1);
    assert_eq!(suite.failed, 1);

    let hung = suite.results[0].failure.as_ref().unwrap();
    assert_eq!(hung.kind, FailureKind::Automation);
    assert!(hung.message.contains("Timeout"), "{}", hung.message);
    assert!(suite.results[1].success);
}
