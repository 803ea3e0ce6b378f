//! Lock-step walk of a value against a classified pattern.
//!
//! Traversal is canonical: array elements by ascending index, object keys in
//! the pattern's declared order. The first divergence found in that order is
//! the one reported, so repeated runs on the same inputs always agree.

use serde_json::{Map, Value};

use crate::config::{MatchConfig, ObjectPolicy};
use crate::equal::equal;
use crate::kind::Kind;
use crate::mismatch::{Mismatch, MismatchKind};
use crate::path::LazyPath;
use crate::pattern::Pattern;

/// Stateless matcher; holds only its configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Check `value` against `pattern`, returning the first mismatch.
    pub fn check(&self, value: &Value, pattern: &Pattern) -> Result<(), Mismatch> {
        self.check_at(value, pattern, &LazyPath::Root)
    }

    /// Whether `value` conforms to `pattern`.
    pub fn is_match(&self, value: &Value, pattern: &Pattern) -> bool {
        self.check(value, pattern).is_ok()
    }

    fn check_at(
        &self,
        value: &Value,
        pattern: &Pattern,
        path: &LazyPath<'_>,
    ) -> Result<(), Mismatch> {
        match pattern {
            Pattern::Any => Ok(()),
            Pattern::Kind(expected) => expect_kind(value, *expected, path),
            Pattern::Literal(expected) => {
                if equal(value, expected) {
                    Ok(())
                } else {
                    Err(mismatch(
                        path,
                        MismatchKind::LiteralMismatch {
                            expected: expected.clone(),
                            found: value.clone(),
                        },
                    ))
                }
            }
            Pattern::Array(patterns) => {
                let items = as_array(value, path)?;
                if items.len() != patterns.len() {
                    return Err(mismatch(
                        path,
                        MismatchKind::LengthMismatch {
                            expected: patterns.len(),
                            found: items.len(),
                        },
                    ));
                }
                for (index, (item, pattern)) in items.iter().zip(patterns).enumerate() {
                    self.check_at(item, pattern, &path.index(index))?;
                }
                Ok(())
            }
            Pattern::Each(pattern) => {
                let items = as_array(value, path)?;
                for (index, item) in items.iter().enumerate() {
                    self.check_at(item, pattern, &path.index(index))?;
                }
                Ok(())
            }
            Pattern::Object(entries) => {
                let map = as_object(value, path)?;
                for (key, pattern) in entries {
                    match map.get(key) {
                        Some(item) => self.check_at(item, pattern, &path.key(key))?,
                        None => {
                            return Err(mismatch(
                                path,
                                MismatchKind::MissingKey { key: key.clone() },
                            ))
                        }
                    }
                }
                if self.config.object_policy == ObjectPolicy::Strict {
                    if let Some(key) = map
                        .keys()
                        .find(|key| !entries.iter().any(|(declared, _)| declared == *key))
                    {
                        return Err(mismatch(
                            path,
                            MismatchKind::UnexpectedKey { key: key.clone() },
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

fn expect_kind(value: &Value, expected: Kind, path: &LazyPath<'_>) -> Result<(), Mismatch> {
    let found = Kind::of(value);
    if found == expected {
        Ok(())
    } else {
        Err(mismatch(path, MismatchKind::KindMismatch { expected, found }))
    }
}

fn as_array<'v>(value: &'v Value, path: &LazyPath<'_>) -> Result<&'v Vec<Value>, Mismatch> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(mismatch(
            path,
            MismatchKind::KindMismatch {
                expected: Kind::Array,
                found: Kind::of(other),
            },
        )),
    }
}

fn as_object<'v>(
    value: &'v Value,
    path: &LazyPath<'_>,
) -> Result<&'v Map<String, Value>, Mismatch> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(mismatch(
            path,
            MismatchKind::KindMismatch {
                expected: Kind::Object,
                found: Kind::of(other),
            },
        )),
    }
}

fn mismatch(path: &LazyPath<'_>, kind: MismatchKind) -> Mismatch {
    Mismatch {
        path: path.to_path(),
        kind,
    }
}
