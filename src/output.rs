//! Output formatting for human and JSON modes
//!
//! Verdicts are rendered either as one line per verdict or as a JSON
//! document `{suite: {rule: [line, ...]}}` with sorted keys. The raw JSON
//! document carries full verdict objects instead of rendered lines.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::models::{RunResults, Verdict};
use crate::core::suites::SuiteInfo;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

type Grouped<'a, T> = BTreeMap<&'a str, BTreeMap<&'a str, Vec<T>>>;

impl RunResults {
    /// Render the results based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                for line in self.render_lines() {
                    println!("{line}");
                }
            },
            OutputMode::Json => println!("{}", self.to_json()),
        }
    }

    /// One rendered line per verdict, suite by suite, rule by rule
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        self.verdicts().map(Verdict::render).collect()
    }

    /// `{suite: {rule: [rendered line]}}` as a JSON value
    #[must_use]
    pub fn json_value(&self) -> serde_json::Value {
        serde_json::to_value(self.grouped(Verdict::render)).unwrap_or_default()
    }

    /// `{suite: {rule: [rendered line]}}`, keys sorted, four-space indent
    #[must_use]
    pub fn to_json(&self) -> String {
        to_pretty(&self.grouped(Verdict::render))
    }

    /// `{suite: {rule: [verdict object]}}`, keys sorted, four-space indent
    #[must_use]
    pub fn to_raw_json(&self) -> String {
        to_pretty(&self.grouped(Verdict::clone))
    }

    /// Text written to a result file: lines, or JSON when `json` is set
    #[must_use]
    pub fn to_log(&self, json: bool) -> String {
        if json {
            self.to_json()
        } else {
            self.render_lines()
                .into_iter()
                .map(|line| line + "\n")
                .collect()
        }
    }

    fn grouped<T>(&self, map: impl Fn(&Verdict) -> T) -> Grouped<'_, T> {
        self.suites
            .iter()
            .map(|suite| {
                let rules: BTreeMap<&str, Vec<T>> = suite
                    .rules
                    .iter()
                    .map(|(rule, verdicts)| (rule.as_str(), verdicts.iter().map(&map).collect::<Vec<_>>()))
                    .collect();
                (suite.name.as_str(), rules)
            })
            .collect()
    }
}

/// Pretty-print with a four-space indent
pub fn to_pretty<T: Serialize>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut serializer).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Result of the `suites` command
#[derive(Debug, Serialize)]
pub struct SuiteListResult {
    /// Discoverable suites, in lookup order
    pub suites: Vec<SuiteEntry>,
}

/// One discoverable suite
#[derive(Debug, Serialize)]
pub struct SuiteEntry {
    /// Suite name
    pub name: String,
    /// `builtin` or the suite file path
    pub origin: String,
}

impl From<Vec<SuiteInfo>> for SuiteListResult {
    fn from(infos: Vec<SuiteInfo>) -> Self {
        Self {
            suites: infos
                .into_iter()
                .map(|info| SuiteEntry {
                    name: info.name,
                    origin: info.origin.to_string(),
                })
                .collect(),
        }
    }
}

impl SuiteListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if self.suites.is_empty() {
            println!("No suites found.");
            return;
        }

        let width = self.suites.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for suite in &self.suites {
            println!("  {:width$}  {}", suite.name, suite.origin);
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}
