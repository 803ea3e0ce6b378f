use serde_json::Value;
use verijson_pattern::{describe, Matcher, Pattern};

use crate::error::{RegistryError, Result};

pub(crate) fn verify_payload(
    name: &str,
    payload: &[u8],
    pattern: &Pattern,
    matcher: Matcher,
) -> Result<()> {
    let value: Value = serde_json::from_slice(payload)?;
    verify_value(name, &value, pattern, matcher)
}

pub(crate) fn verify_value(
    name: &str,
    value: &Value,
    pattern: &Pattern,
    matcher: Matcher,
) -> Result<()> {
    matcher.check(value, pattern).map_err(|mismatch| {
        tracing::debug!(pattern = name, code = mismatch.code(), path = %mismatch.path, "payload rejected");
        RegistryError::Verification {
            name: name.to_string(),
            source: describe(&mismatch),
        }
    })
}
