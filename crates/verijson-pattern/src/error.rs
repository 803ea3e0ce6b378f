use crate::path::Path;

/// The pattern source contains a malformed wildcard token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid pattern at \"{path}\": {reason}")]
pub struct InvalidPattern {
    /// What is wrong with the token.
    pub reason: String,
    /// Location of the token within the pattern source.
    pub path: Path,
}

/// Errors returned by [`verify`](crate::verify).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// The pattern failed to classify.
    #[error("invalid pattern at \"{path}\": {reason}")]
    InvalidPattern { reason: String, path: Path },

    /// The value does not conform to the pattern.
    #[error("{code} at \"{path}\": expected {expected}, found {found}")]
    Mismatch {
        code: &'static str,
        path: Path,
        expected: String,
        found: String,
    },
}

impl VerificationError {
    /// Machine-checkable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::InvalidPattern { .. } => "invalid_pattern",
            VerificationError::Mismatch { code, .. } => code,
        }
    }

    /// Location the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            VerificationError::InvalidPattern { path, .. }
            | VerificationError::Mismatch { path, .. } => path,
        }
    }
}

impl From<InvalidPattern> for VerificationError {
    fn from(err: InvalidPattern) -> Self {
        VerificationError::InvalidPattern {
            reason: err.reason,
            path: err.path,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerificationError>;
