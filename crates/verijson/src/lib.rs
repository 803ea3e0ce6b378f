//! Verify JSON values against declarative pattern trees.
//!
//! A pattern is a JSON document describing the values it accepts: literals
//! match exactly, `"$string"`-style wildcards match any value of a kind, and
//! arrays and objects describe nested shapes.
//!
//! # Crate Structure
//!
//! - [`pattern`] — Pattern model, matcher, and mismatch reporting
//! - [`registry`] — Named patterns loaded from files (behind `registry` feature)
//!
//! The common entry points are re-exported at the crate root.

/// Re-export pattern types.
pub mod pattern {
    pub use verijson_pattern::*;
}

/// Re-export registry types (requires `registry` feature).
#[cfg(feature = "registry")]
pub mod registry {
    pub use verijson_registry::*;
}

pub use verijson_pattern::{
    verify, verify_with_config, MatchConfig, Matcher, Mismatch, ObjectPolicy, Pattern,
    VerificationError,
};

/// Decode `value_json` and `pattern_json`, then [`verify`] one against the other.
pub fn verify_str(value_json: &str, pattern_json: &str) -> Result<(), VerifyStrError> {
    let value: serde_json::Value = serde_json::from_str(value_json).map_err(VerifyStrError::Value)?;
    let pattern: serde_json::Value =
        serde_json::from_str(pattern_json).map_err(VerifyStrError::Pattern)?;
    verify(&value, &pattern).map_err(VerifyStrError::Verification)
}

/// Errors returned by [`verify_str`].
#[derive(Debug, thiserror::Error)]
pub enum VerifyStrError {
    /// The value text is not valid JSON.
    #[error("value is not valid JSON: {0}")]
    Value(#[source] serde_json::Error),

    /// The pattern text is not valid JSON.
    #[error("pattern is not valid JSON: {0}")]
    Pattern(#[source] serde_json::Error),

    /// Decoding succeeded but verification failed.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_str_decodes_and_verifies() {
        assert!(verify_str(r#"{"id": 3}"#, r#"{"id": "$number"}"#).is_ok());

        let err = verify_str(r#"{"id": "3"}"#, r#"{"id": "$number"}"#).unwrap_err();
        assert!(matches!(err, VerifyStrError::Verification(ref e) if e.code() == "kind_mismatch"));
    }

    #[test]
    fn verify_str_distinguishes_decode_failures() {
        assert!(matches!(
            verify_str("{", "{}"),
            Err(VerifyStrError::Value(_))
        ));
        assert!(matches!(
            verify_str("{}", "[1,"),
            Err(VerifyStrError::Pattern(_))
        ));
    }
}
