use std::path::Path;

use serde_json::Value;
use verijson_pattern::{describe, MatchConfig, Matcher, ObjectPolicy, Pattern, VerificationError};
use verijson_registry::{PatternRegistry, RegistryConfig, RegistryError};

use crate::cmd::{decode_pattern, read_json, read_pattern, reads_stdin, CheckArgs};
use crate::exit::{
    registry_error, CliError, CliResult, DATA_INVALID, PATTERN_INVALID, SUCCESS, USAGE,
};
use crate::output::{print_check, CheckReport, OutputFormat};

/// Verdict of one check, plus the registry pattern that failed to classify.
struct Outcome {
    result: Result<(), VerificationError>,
    pattern: Option<String>,
}

impl From<Result<(), VerificationError>> for Outcome {
    fn from(result: Result<(), VerificationError>) -> Self {
        Self {
            result,
            pattern: None,
        }
    }
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let outcome = match (&args.patterns, &args.name) {
        (Some(dir), Some(name)) => check_registry(&args, dir, name)?,
        _ => check_single(&args)?.into(),
    };

    let mut report = match &outcome.result {
        Ok(()) => CheckReport::matched(),
        Err(err) => CheckReport::from_error(err),
    };
    report.pattern = outcome.pattern;
    print_check(&report, format);

    Ok(exit_code(&outcome.result))
}

fn check_single(args: &CheckArgs) -> CliResult<Result<(), VerificationError>> {
    let source = match (&args.pattern, &args.pattern_json) {
        (_, Some(inline)) => decode_pattern(inline.as_bytes(), "--pattern-json")?,
        (path, None) => {
            let path = path.as_deref();
            if reads_stdin(path) && reads_stdin(args.value.as_deref()) {
                return Err(CliError::new(
                    USAGE,
                    "pattern and value cannot both be read from stdin",
                ));
            }
            read_pattern(path)?
        }
    };

    let pattern = match Pattern::classify(&source) {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::warn!(path = %err.path, "pattern failed to classify");
            return Ok(Err(err.into()));
        }
    };
    tracing::debug!(nodes = pattern.size(), "pattern classified");

    let value = read_json(args.value.as_deref())?;
    Ok(check_value(&value, &pattern, match_config(args.strict)))
}

fn check_registry(args: &CheckArgs, dir: &Path, name: &str) -> CliResult<Outcome> {
    let config = RegistryConfig {
        strict_mode: args.strict,
        fail_on_missing_pattern: true,
        ..RegistryConfig::default()
    };
    let registry = match PatternRegistry::from_directory_with_config(dir, config) {
        Ok(registry) => registry,
        Err(RegistryError::InvalidPattern {
            name: broken,
            source,
        }) => {
            tracing::warn!(pattern = %broken, "pattern failed to classify");
            return Ok(Outcome {
                result: Err(source.into()),
                pattern: Some(broken),
            });
        }
        Err(err) => return Err(registry_error("failed loading patterns", err)),
    };
    tracing::debug!(count = registry.names().len(), "pattern registry loaded");

    let value = read_json(args.value.as_deref())?;
    let result = match registry.verify_value(name, &value) {
        Ok(()) => Ok(()),
        Err(RegistryError::Verification { source, .. }) => Err(source),
        Err(err) => return Err(registry_error("check failed", err)),
    };
    Ok(result.into())
}

fn check_value(
    value: &Value,
    pattern: &Pattern,
    config: MatchConfig,
) -> Result<(), VerificationError> {
    Matcher::with_config(config)
        .check(value, pattern)
        .map_err(|mismatch| {
            tracing::info!(code = mismatch.code(), path = %mismatch.path, "value does not match");
            describe(&mismatch)
        })
}

fn match_config(strict: bool) -> MatchConfig {
    MatchConfig {
        object_policy: if strict {
            ObjectPolicy::Strict
        } else {
            ObjectPolicy::Open
        },
    }
}

fn exit_code(outcome: &Result<(), VerificationError>) -> i32 {
    match outcome {
        Ok(()) => SUCCESS,
        Err(VerificationError::Mismatch { .. }) => DATA_INVALID,
        Err(VerificationError::InvalidPattern { .. }) => PATTERN_INVALID,
    }
}
