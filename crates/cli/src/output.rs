//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use singlish_e2e::{CaseOutcome, Expectation, SuiteResult, TestCase};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for TestCase {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Category", "Input", "Expectation"]
    }

    fn row(&self) -> Vec<String> {
        let expectation = match &self.expectation {
            Expectation::Matches(p) => format!("matches {}", p),
            Expectation::NotMatches(p) => format!("not matches {}", p),
        };
        vec![
            self.title(),
            self.category.to_string(),
            visible(&self.input),
            expectation,
        ]
    }
}

impl TableDisplay for CaseOutcome {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Attempt", "Result", "Duration", "Failure"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.attempt.to_string(),
            if self.success { "pass" } else { "FAIL" }.to_string(),
            format!("{} ms", self.duration_ms),
            self.failure
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Escape control characters and truncate so one case stays on one line
fn visible(input: &str) -> String {
    let escaped: String = input.escape_debug().collect();
    if escaped.chars().count() > 40 {
        let head: String = escaped.chars().take(37).collect();
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", escaped)
    }
}

fn new_table(headers: Vec<&'static str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Print the selected cases
pub fn print_cases(cases: &[TestCase], format: OutputFormat) {
    if cases.is_empty() {
        println!("No cases found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = new_table(TestCase::headers());
            for case in cases {
                table.add_row(case.row());
            }
            println!("{table}");
            println!("{} case(s)", cases.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(cases).unwrap_or_default());
        }
        OutputFormat::Plain => print_plain(cases),
    }
}

/// Print a finished run
pub fn print_suite(suite: &SuiteResult, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = new_table(CaseOutcome::headers());
            for outcome in &suite.results {
                let color = if outcome.success { Color::Green } else { Color::Red };
                let cells: Vec<Cell> = outcome
                    .row()
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| if i == 2 { Cell::new(v).fg(color) } else { Cell::new(v) })
                    .collect();
                table.add_row(cells);
            }
            println!("{table}");
            print_summary(suite);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(suite).unwrap_or_default());
        }
        OutputFormat::Plain => {
            print_plain(&suite.results);
            println!("---");
            print_summary(suite);
        }
    }
}

fn print_plain<T: TableDisplay>(items: &[T]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            println!("---");
        }
        for (header, value) in T::headers().iter().zip(item.row().iter()) {
            println!("{}: {}", header, value);
        }
    }
}

fn print_summary(suite: &SuiteResult) {
    let line = format!(
        "{} passed, {} failed, {} total ({} ms)",
        suite.passed, suite.failed, suite.total, suite.duration_ms
    );
    if suite.success() {
        print_success(&line);
    } else {
        print_error(&line);
    }
    for id in &suite.unstable {
        print_warning(&format!("{} gave different results across attempts", id));
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_escapes_control_characters() {
        assert_eq!(visible("a\nb\t"), "\"a\\nb\\t\"");
        assert_eq!(visible(""), "\"\"");
    }

    #[test]
    fn test_visible_truncates_long_input() {
        let shown = visible(&"a".repeat(60));
        assert!(shown.ends_with("...\""));
        assert_eq!(shown.chars().count(), 37 + 5);
    }
}
