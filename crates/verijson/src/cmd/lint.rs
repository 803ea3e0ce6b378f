use verijson_pattern::Pattern;

use crate::cmd::{read_pattern, LintArgs};
use crate::exit::{CliResult, PATTERN_INVALID, SUCCESS};
use crate::output::{print_lint, LintEntry, LintReport, OutputFormat};

pub fn run(args: LintArgs, format: OutputFormat) -> CliResult<i32> {
    let files: Vec<LintEntry> = args
        .files
        .iter()
        .map(|path| lint_file(path))
        .collect();

    let all_valid = files.iter().all(|entry| entry.valid);
    let report = LintReport {
        schema_id: "https://schemas.3leaps.dev/verijson/cli/v1/lint-report.schema.json",
        files,
        overall: if all_valid { "pass" } else { "fail" },
    };
    print_lint(&report, format);

    if all_valid {
        Ok(SUCCESS)
    } else {
        Ok(PATTERN_INVALID)
    }
}

fn lint_file(path: &std::path::Path) -> LintEntry {
    let file = path.display().to_string();
    let source = match read_pattern(Some(path)) {
        Ok(source) => source,
        Err(err) => {
            tracing::warn!(file = %file, "pattern file unreadable");
            return LintEntry {
                file,
                valid: false,
                nodes: None,
                path: None,
                detail: Some(err.message),
            };
        }
    };

    match Pattern::classify(&source) {
        Ok(pattern) => LintEntry {
            file,
            valid: true,
            nodes: Some(pattern.size()),
            path: None,
            detail: None,
        },
        Err(err) => {
            tracing::warn!(file = %file, path = %err.path, "pattern failed to classify");
            LintEntry {
                file,
                valid: false,
                nodes: None,
                path: Some(err.path.to_string()),
                detail: Some(err.reason),
            }
        }
    }
}
