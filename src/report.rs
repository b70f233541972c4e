//! Mochawesome test report adapter.
//!
//! The report nests suites inside suites, each owning a flat list of tests.
//! [`TestReport::run_result`] flattens the whole tree and partitions the
//! tests by outcome into canonical `"name: description"` labels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Character surrounding the short test identifier inside a full title,
/// e.g. `Facade ~Q1~ should reject empty queries.`
pub const TITLE_DELIMITER: char = '~';

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReport {
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub suites: Suite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub suites: u64,
    pub tests: u64,
    pub passes: u64,
    pub pending: u64,
    pub failures: u64,
    pub skipped: u64,
    pub duration: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Suite {
    pub title: String,
    pub tests: Vec<TestCase>,
    pub suites: Vec<Suite>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestCase {
    pub title: String,
    pub full_title: String,
    pub pass: bool,
    pub fail: bool,
    pub pending: bool,
    pub skipped: bool,
}

/// Flat outcome of one test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResult {
    pub failing: Vec<String>,
    pub passing: Vec<String>,
    pub pending: Vec<String>,
    pub skipped: Vec<String>,
}

impl TestRunResult {
    pub fn is_killed(&self) -> bool {
        !self.failing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub name: String,
    pub description: String,
}

impl TestReport {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Every test in the tree: a suite's own tests, then each child's.
    pub fn all_tests(&self) -> Vec<&TestCase> {
        let mut tests = Vec::new();
        collect_tests(&self.suites, &mut tests);
        tests
    }

    pub fn run_result(&self) -> TestRunResult {
        let mut result = TestRunResult::default();
        for test in self.all_tests() {
            let label = || format_title(&parse_title(&test.full_title, TITLE_DELIMITER));
            if test.fail {
                result.failing.push(label());
            }
            if test.pass {
                result.passing.push(label());
            }
            if test.pending {
                result.pending.push(label());
            }
            if test.skipped {
                result.skipped.push(label());
            }
        }
        result
    }
}

fn collect_tests<'a>(suite: &'a Suite, tests: &mut Vec<&'a TestCase>) {
    tests.extend(suite.tests.iter());
    for child in &suite.suites {
        collect_tests(child, tests);
    }
}

/// Split a title into the delimited name and the description after it.
/// Without two delimiters there is no name; one trailing `.` is dropped.
pub fn parse_title(title: &str, delimiter: char) -> TitleParts {
    let width = delimiter.len_utf8();
    let (name, rest) = match (title.find(delimiter), title.rfind(delimiter)) {
        (Some(first), Some(last)) if first < last => {
            (title[first + width..last].trim(), &title[last + width..])
        }
        (Some(_), Some(last)) => ("", &title[last + width..]),
        _ => ("", title),
    };
    let description = rest.trim();
    let description = description.strip_suffix('.').unwrap_or(description);

    TitleParts {
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub fn format_title(parts: &TitleParts) -> String {
    if parts.name.is_empty() {
        parts.description.clone()
    } else {
        format!("{}: {}", parts.name, parts.description)
    }
}
