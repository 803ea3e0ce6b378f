use clap::{Args, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, PATTERN_INVALID};
use crate::output::OutputFormat;

pub mod check;
pub mod lint;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a JSON value against a pattern.
    Check(CheckArgs),
    /// Classify pattern files without verifying any value.
    Lint(LintArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Lint(args) => lint::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Value file to verify ("-" or omitted reads stdin).
    pub value: Option<PathBuf>,
    /// Pattern file.
    #[arg(
        long,
        short = 'p',
        value_name = "FILE",
        conflicts_with_all = ["pattern_json", "patterns"],
        required_unless_present_any = ["pattern_json", "patterns"]
    )]
    pub pattern: Option<PathBuf>,
    /// Inline pattern JSON.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["pattern", "patterns"])]
    pub pattern_json: Option<String>,
    /// Directory of `<name>.pattern.json` files.
    #[arg(long, value_name = "DIR", requires = "name")]
    pub patterns: Option<PathBuf>,
    /// Pattern name to use from --patterns.
    #[arg(long, short = 'n', requires = "patterns")]
    pub name: Option<String>,
    /// Reject object keys the pattern does not declare.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Pattern files to classify.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read and decode a JSON value from `path`, or stdin when `path` is absent or "-".
pub(crate) fn read_json(path: Option<&Path>) -> CliResult<Value> {
    let (bytes, origin) = read_input(path)?;
    decode_json(&bytes, &origin)
}

/// Read and decode pattern JSON; undecodable text is a pattern error.
pub(crate) fn read_pattern(path: Option<&Path>) -> CliResult<Value> {
    let (bytes, origin) = read_input(path)?;
    decode_pattern(&bytes, &origin)
}

pub(crate) fn decode_json(bytes: &[u8], origin: &str) -> CliResult<Value> {
    decode(bytes, origin, DATA_INVALID)
}

pub(crate) fn decode_pattern(bytes: &[u8], origin: &str) -> CliResult<Value> {
    decode(bytes, origin, PATTERN_INVALID)
}

pub(crate) fn reads_stdin(path: Option<&Path>) -> bool {
    path.is_none_or(|path| path == Path::new("-"))
}

fn read_input(path: Option<&Path>) -> CliResult<(Vec<u8>, String)> {
    match path {
        Some(path) if !reads_stdin(Some(path)) => {
            let bytes = std::fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
            Ok((bytes, path.display().to_string()))
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok((bytes, "stdin".to_string()))
        }
    }
}

fn decode(bytes: &[u8], origin: &str, code: i32) -> CliResult<Value> {
    serde_json::from_slice(bytes)
        .map_err(|err| CliError::new(code, format!("{origin} is not valid JSON: {err}")))
}
