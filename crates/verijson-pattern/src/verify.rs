use serde_json::Value;

use crate::config::MatchConfig;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::mismatch::describe;
use crate::pattern::Pattern;

/// Verify `value` against a raw pattern source with the default config.
pub fn verify(value: &Value, pattern_source: &Value) -> Result<()> {
    verify_with_config(value, pattern_source, MatchConfig::default())
}

/// Verify `value` against a raw pattern source.
///
/// The pattern is classified before the value is examined, so a malformed
/// pattern is reported as [`VerificationError::InvalidPattern`] regardless of
/// the value.
///
/// [`VerificationError::InvalidPattern`]: crate::VerificationError::InvalidPattern
pub fn verify_with_config(
    value: &Value,
    pattern_source: &Value,
    config: MatchConfig,
) -> Result<()> {
    let pattern = Pattern::classify(pattern_source).map_err(|err| {
        tracing::debug!(path = %err.path, reason = %err.reason, "pattern rejected");
        err
    })?;

    Matcher::with_config(config)
        .check(value, &pattern)
        .map_err(|mismatch| {
            tracing::debug!(code = mismatch.code(), path = %mismatch.path, "value rejected");
            describe(&mismatch)
        })
}
