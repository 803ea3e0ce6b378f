use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use verijson_pattern::VerificationError;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Match,
    Mismatch,
    InvalidPattern,
}

/// Result of one `check` run.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub schema_id: &'static str,
    pub status: CheckStatus,
    /// Registry pattern the failure belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

const CHECK_SCHEMA_ID: &str = "https://schemas.3leaps.dev/verijson/cli/v1/check-report.schema.json";

impl CheckReport {
    pub fn matched() -> Self {
        Self {
            schema_id: CHECK_SCHEMA_ID,
            status: CheckStatus::Match,
            pattern: None,
            code: None,
            path: None,
            expected: None,
            found: None,
            reason: None,
        }
    }

    pub fn from_error(err: &VerificationError) -> Self {
        match err {
            VerificationError::InvalidPattern { reason, path } => Self {
                status: CheckStatus::InvalidPattern,
                code: Some(err.code()),
                path: Some(path.to_string()),
                reason: Some(reason.clone()),
                ..Self::matched()
            },
            VerificationError::Mismatch {
                code,
                path,
                expected,
                found,
            } => Self {
                status: CheckStatus::Mismatch,
                code: Some(*code),
                path: Some(path.to_string()),
                expected: Some(expected.clone()),
                found: Some(found.clone()),
                ..Self::matched()
            },
        }
    }
}

pub fn print_check(report: &CheckReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATUS", "PATTERN", "CODE", "PATH", "EXPECTED", "FOUND"])
                .add_row(vec![
                    status_text(report.status).to_string(),
                    report.pattern.clone().unwrap_or_else(|| "-".to_string()),
                    report.code.unwrap_or("-").to_string(),
                    display_path(report.path.as_deref()),
                    report
                        .expected
                        .clone()
                        .or_else(|| report.reason.clone())
                        .unwrap_or_else(|| "-".to_string()),
                    report.found.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match report.status {
            CheckStatus::Match => println!("match"),
            CheckStatus::Mismatch => println!(
                "mismatch ({}) at {}: expected {}, found {}",
                report.code.unwrap_or("-"),
                display_path(report.path.as_deref()),
                report.expected.as_deref().unwrap_or("-"),
                report.found.as_deref().unwrap_or("-"),
            ),
            CheckStatus::InvalidPattern => match &report.pattern {
                Some(name) => println!(
                    "invalid pattern {name:?} at {}: {}",
                    display_path(report.path.as_deref()),
                    report.reason.as_deref().unwrap_or("-"),
                ),
                None => println!(
                    "invalid pattern at {}: {}",
                    display_path(report.path.as_deref()),
                    report.reason.as_deref().unwrap_or("-"),
                ),
            },
        },
    }
}

/// Result of linting one pattern file.
#[derive(Debug, Serialize)]
pub struct LintEntry {
    pub file: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LintReport {
    pub schema_id: &'static str,
    pub files: Vec<LintEntry>,
    pub overall: &'static str,
}

pub fn print_lint(report: &LintReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FILE", "RESULT", "NODES", "DETAIL"]);
            for entry in &report.files {
                table.add_row(vec![
                    entry.file.clone(),
                    lint_text(entry.valid).to_string(),
                    entry
                        .nodes
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    lint_detail(entry),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in &report.files {
                println!(
                    "  [{:>4}] {:<32} {}",
                    lint_text(entry.valid),
                    entry.file,
                    lint_detail(entry)
                );
            }
            println!("\n  Result: {}", report.overall);
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Match => "MATCH",
        CheckStatus::Mismatch => "MISMATCH",
        CheckStatus::InvalidPattern => "INVALID PATTERN",
    }
}

fn lint_text(valid: bool) -> &'static str {
    if valid {
        "PASS"
    } else {
        "FAIL"
    }
}

fn lint_detail(entry: &LintEntry) -> String {
    match (&entry.path, &entry.detail) {
        (Some(path), Some(detail)) => format!("{}: {detail}", display_path(Some(path.as_str()))),
        (None, Some(detail)) => detail.clone(),
        _ => "-".to_string(),
    }
}

fn display_path(path: Option<&str>) -> String {
    match path {
        Some("") => "(root)".to_string(),
        Some(path) => path.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use verijson_pattern::verify;

    use super::*;

    #[test]
    fn mismatch_report_serializes_all_fields() {
        let err = verify(&json!({"a": [1, 2]}), &json!({"a": [1, 9]})).unwrap_err();
        let report = CheckReport::from_error(&err);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "mismatch");
        assert_eq!(value["code"], "literal_mismatch");
        assert_eq!(value["path"], "/a/1");
        assert_eq!(value["expected"], "9");
        assert_eq!(value["found"], "2");
        assert!(value.get("reason").is_none());
    }

    #[test]
    fn match_report_omits_failure_fields() {
        let value = serde_json::to_value(CheckReport::matched()).unwrap();
        assert_eq!(
            value,
            json!({"schema_id": CHECK_SCHEMA_ID, "status": "match"})
        );
    }

    #[test]
    fn invalid_pattern_report_carries_reason() {
        let err = verify(&json!(1), &json!(["$wat"])).unwrap_err();
        let report = CheckReport::from_error(&err);

        assert_eq!(report.status, CheckStatus::InvalidPattern);
        assert_eq!(report.code, Some("invalid_pattern"));
        assert_eq!(report.path.as_deref(), Some("/0"));
        assert!(report.reason.is_some());
    }

    #[test]
    fn registry_failure_names_its_pattern() {
        let err = verify(&json!(1), &json!({"x": "$strng"})).unwrap_err();
        let mut report = CheckReport::from_error(&err);
        report.pattern = Some("audit".to_string());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["pattern"], "audit");
        assert_eq!(value["path"], "/x");
    }

    #[test]
    fn root_path_is_labelled() {
        assert_eq!(display_path(Some("")), "(root)");
        assert_eq!(display_path(Some("/x")), "/x");
        assert_eq!(display_path(None), "-");
    }
}
