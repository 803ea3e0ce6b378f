use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::VerificationError;
use crate::kind::Kind;
use crate::path::Path;

/// What diverged at a mismatch location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum MismatchKind {
    /// The value has the wrong tag.
    KindMismatch { expected: Kind, found: Kind },
    /// The value differs from a literal.
    LiteralMismatch { expected: Value, found: Value },
    /// An array has the wrong number of elements.
    LengthMismatch { expected: usize, found: usize },
    /// A key required by an object pattern is absent.
    MissingKey { key: String },
    /// A key is present that a strict object pattern does not declare.
    UnexpectedKey { key: String },
}

impl MismatchKind {
    pub fn code(&self) -> &'static str {
        match self {
            MismatchKind::KindMismatch { .. } => "kind_mismatch",
            MismatchKind::LiteralMismatch { .. } => "literal_mismatch",
            MismatchKind::LengthMismatch { .. } => "length_mismatch",
            MismatchKind::MissingKey { .. } => "missing_key",
            MismatchKind::UnexpectedKey { .. } => "unexpected_key",
        }
    }
}

/// First point of divergence between a value and a pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub path: Path,
    #[serde(flatten)]
    pub kind: MismatchKind,
}

impl Mismatch {
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Rendering of what the pattern expected.
    pub fn expected(&self) -> String {
        match &self.kind {
            MismatchKind::KindMismatch { expected, .. } => format!("any {expected}"),
            MismatchKind::LiteralMismatch { expected, .. } => expected.to_string(),
            MismatchKind::LengthMismatch { expected, .. } => {
                format!("{expected} {}", plural(*expected, "element"))
            }
            MismatchKind::MissingKey { key } => format!("key {}", quoted(key)),
            MismatchKind::UnexpectedKey { .. } => "no undeclared keys".to_string(),
        }
    }

    /// Rendering of what the value contained.
    pub fn found(&self) -> String {
        match &self.kind {
            MismatchKind::KindMismatch { found, .. } => found.to_string(),
            MismatchKind::LiteralMismatch { found, .. } => found.to_string(),
            MismatchKind::LengthMismatch { found, .. } => {
                format!("{found} {}", plural(*found, "element"))
            }
            MismatchKind::MissingKey { .. } => "no such key".to_string(),
            MismatchKind::UnexpectedKey { key } => format!("key {}", quoted(key)),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str("at root")?;
        } else {
            write!(f, "at {}", self.path)?;
        }
        write!(f, ": expected {}, found {}", self.expected(), self.found())
    }
}

/// Render a mismatch as the externally visible error.
pub fn describe(mismatch: &Mismatch) -> VerificationError {
    VerificationError::Mismatch {
        code: mismatch.code(),
        path: mismatch.path.clone(),
        expected: mismatch.expected(),
        found: mismatch.found(),
    }
}

impl From<Mismatch> for VerificationError {
    fn from(mismatch: Mismatch) -> Self {
        describe(&mismatch)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn quoted(key: &str) -> String {
    Value::String(key.to_string()).to_string()
}
