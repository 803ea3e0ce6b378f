use verijson_pattern::{InvalidPattern, VerificationError};

/// Errors that can occur while loading patterns or verifying payloads.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The pattern file could not be loaded.
    #[error("failed to load pattern: {0}")]
    LoadFailed(String),

    /// The pattern source contains a malformed wildcard.
    #[error("pattern {name:?} is invalid: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: InvalidPattern,
    },

    /// The pattern text is not valid JSON.
    #[error("pattern {name:?} is not valid JSON: {source}")]
    UndecodablePattern {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload does not conform to its pattern.
    #[error("verification failed for pattern {name:?}: {source}")]
    Verification {
        name: String,
        #[source]
        source: VerificationError,
    },

    /// The payload is not valid JSON.
    #[error("not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// No pattern registered under the given name.
    #[error("no pattern registered as {0:?}")]
    NoPattern(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
