//! Declarative case tables
//!
//! A case is one input string plus one expectation over the text the page
//! renders after the input is submitted. Cases come from the built-in
//! catalog or from YAML files and are validated before anything runs.

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::catalog;
use crate::error::{E2eError, E2eResult};

/// A validated expectation pattern.
///
/// The same source is compiled here with `regex` and handed to the browser
/// as a JavaScript `RegExp` with the `u` flag, so only the syntax both
/// engines agree on is accepted.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, String> {
        if source.is_empty() {
            return Err("pattern is empty".to_string());
        }
        check_portable(source)?;
        let regex = Regex::new(source).map_err(|e| e.to_string())?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Escapes that mean the same thing to `regex` and to a JavaScript `u`-mode
/// `RegExp`. `\d`, `\w` and `\b` are Unicode-aware in `regex` but ASCII in
/// JavaScript, so they are left out along with `\x`, `\p`, `\A`, `\z`.
/// `u`-mode only allows escaping syntax characters (and `-` inside a class).
fn portable_escape(c: char, in_class: bool) -> bool {
    match c {
        's' | 'S' | 'n' | 't' | 'r' | 'f' | 'v' => true,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
        | '/' => true,
        '-' => in_class,
        _ => false,
    }
}

/// Reject syntax that `regex` accepts but a JavaScript `u`-mode `RegExp`
/// rejects or reads differently. Lookarounds are rejected by `regex` itself.
fn check_portable(source: &str) -> Result<(), String> {
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    let mut in_class = false;

    while i < chars.len() {
        let next = chars.get(i + 1).copied();
        match chars[i] {
            '\\' => {
                match next {
                    Some('u') if chars.get(i + 2) == Some(&'{') => {}
                    Some('u') if chars[i + 2..].iter().take(4).filter(|c| c.is_ascii_hexdigit()).count()
                        == 4 => {}
                    Some('u') => return Err(format!("malformed \\u escape at offset {}", i)),
                    Some(c) if portable_escape(c, in_class) => {}
                    Some(c) => {
                        return Err(format!(
                            "escape \\{} at offset {} is not portable to the browser",
                            c, i
                        ))
                    }
                    None => {}
                }
                i += 2;
                continue;
            }
            '[' if !in_class => {
                in_class = true;
                if next == Some('^') {
                    i += 1;
                }
                // a leading `]` is literal in `regex` but closes the class in JavaScript
                if chars.get(i + 1) == Some(&']') {
                    return Err(format!("empty or `]`-leading class at offset {}", i));
                }
            }
            '[' => {
                return Err(format!(
                    "nested class or POSIX class at offset {} is not portable to the browser",
                    i
                ))
            }
            ']' if in_class => in_class = false,
            c @ ('&' | '-' | '~') if in_class && next == Some(c) => {
                return Err(format!(
                    "class operator `{}{}` at offset {} is not portable to the browser",
                    c, c, i
                ))
            }
            '(' if !in_class && next == Some('?') => match chars.get(i + 2) {
                Some(':') => {}
                Some('<') if !matches!(chars.get(i + 3), Some('=') | Some('!')) => {}
                _ => {
                    return Err(format!(
                        "group syntax at offset {} is not portable to the browser",
                        i
                    ))
                }
            },
            _ => {}
        }
        i += 1;
    }

    Ok(())
}

/// What the page must (or must not) show after the input is submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Output text must come to contain a match within the positive window
    Matches(Pattern),
    /// No new match may surface during the negative window; the input must be
    /// retained and the page must stay on the target origin
    NotMatches(Pattern),
}

impl Expectation {
    pub fn pattern(&self) -> &Pattern {
        match self {
            Expectation::Matches(p) | Expectation::NotMatches(p) => p,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Expectation::Matches(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ui,
    PositiveFunctional,
    NegativeFunctional,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ui => "ui",
            Category::PositiveFunctional => "positive_functional",
            Category::NegativeFunctional => "negative_functional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "ui" => Ok(Category::Ui),
            "positive" | "positive_functional" | "pos" => Ok(Category::PositiveFunctional),
            "negative" | "negative_functional" | "neg" => Ok(Category::NegativeFunctional),
            other => Err(E2eError::CaseParse(format!("unknown category: {}", other))),
        }
    }
}

/// A single validated case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: Category,
    pub input: String,
    pub expectation: Expectation,
}

impl TestCase {
    /// Label used in logs and reports: `id - name` or just the id.
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{} - {}", self.id, name),
            None => self.id.clone(),
        }
    }
}

/// Unvalidated case as written in YAML or in the built-in catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDef {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub input: String,

    #[serde(default)]
    pub matches: Option<String>,

    #[serde(default)]
    pub not_matches: Option<String>,
}

impl CaseDef {
    pub fn positive(id: &str, input: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            input: input.to_string(),
            matches: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn negative(id: &str, input: &str, pattern: &str) -> Self {
        Self {
            id: id.to_string(),
            input: input.to_string(),
            not_matches: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    fn validate(self) -> E2eResult<TestCase> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(E2eError::CaseParse("case id must not be empty".to_string()));
        }

        let compile = |source: &str| {
            Pattern::new(source).map_err(|reason| E2eError::InvalidPattern {
                id: id.clone(),
                reason,
            })
        };

        let expectation = match (self.matches.as_deref(), self.not_matches.as_deref()) {
            (Some(p), None) => Expectation::Matches(compile(p)?),
            (None, Some(p)) => Expectation::NotMatches(compile(p)?),
            (Some(_), Some(_)) => {
                return Err(E2eError::CaseParse(format!(
                    "case {} sets both `matches` and `not_matches`",
                    id
                )))
            }
            (None, None) => {
                return Err(E2eError::CaseParse(format!(
                    "case {} needs one of `matches` or `not_matches`",
                    id
                )))
            }
        };

        let category = self.category.unwrap_or(if expectation.is_positive() {
            Category::PositiveFunctional
        } else {
            Category::NegativeFunctional
        });

        Ok(TestCase {
            id,
            name: self.name,
            category,
            input: self.input,
            expectation,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseFile {
    cases: Vec<CaseDef>,
}

/// Selection applied to a case set before running
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Exact ids; empty means all
    pub ids: Vec<String>,
    pub category: Option<Category>,
    /// Matched against id and name
    pub grep: Option<Regex>,
}

impl CaseFilter {
    pub fn accepts(&self, case: &TestCase) -> bool {
        if !self.ids.is_empty() && !self.ids.iter().any(|id| id == &case.id) {
            return false;
        }
        if let Some(category) = self.category {
            if case.category != category {
                return false;
            }
        }
        if let Some(grep) = &self.grep {
            let name = case.name.as_deref().unwrap_or("");
            if !grep.is_match(&case.id) && !grep.is_match(name) {
                return false;
            }
        }
        true
    }
}

/// An ordered set of cases with unique ids
#[derive(Debug, Clone, Default)]
pub struct CaseSet {
    cases: Vec<TestCase>,
}

impl CaseSet {
    /// The built-in case table
    pub fn builtin() -> E2eResult<Self> {
        Self::from_defs(catalog::builtin())
    }

    pub fn from_defs(defs: Vec<CaseDef>) -> E2eResult<Self> {
        let mut set = Self::default();
        for def in defs {
            set.push(def.validate()?)?;
        }
        Ok(set)
    }

    /// Parse a case file from a YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let file: CaseFile = serde_yaml::from_str(yaml)?;
        Self::from_defs(file.cases)
    }

    /// Parse a case file from disk
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            E2eError::Yaml(inner) => {
                E2eError::CaseParse(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    /// Load every `*.yaml` / `*.yml` file under `dir`, in path order
    pub fn load_dir(dir: &Path) -> E2eResult<Self> {
        if !dir.is_dir() {
            return Err(E2eError::InvalidConfig(format!(
                "case directory not found: {}",
                dir.display()
            )));
        }

        let mut set = Self::default();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            set.extend(Self::from_file(entry.path())?)?;
        }

        Ok(set)
    }

    /// Append a case, rejecting duplicate ids
    pub fn push(&mut self, case: TestCase) -> E2eResult<()> {
        if self.get(&case.id).is_some() {
            return Err(E2eError::DuplicateCase(case.id));
        }
        self.cases.push(case);
        Ok(())
    }

    pub fn extend(&mut self, other: CaseSet) -> E2eResult<()> {
        for case in other.cases {
            self.push(case)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// Cases accepted by `filter`, in table order
    pub fn select(&self, filter: &CaseFilter) -> E2eResult<Vec<TestCase>> {
        let known: HashSet<&str> = self.cases.iter().map(|c| c.id.as_str()).collect();
        if let Some(missing) = filter.ids.iter().find(|id| !known.contains(id.as_str())) {
            return Err(E2eError::CaseNotFound(missing.clone()));
        }

        Ok(self
            .cases
            .iter()
            .filter(|c| filter.accepts(c))
            .cloned()
            .collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
