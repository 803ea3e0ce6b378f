//! Classification of raw pattern sources.
//!
//! A pattern source is an ordinary decoded JSON value. Strings carrying the
//! `$` sigil are wildcard tokens:
//!
//! | token      | matches                  |
//! |------------|--------------------------|
//! | `$any`     | every value              |
//! | `$null`    | `null`                   |
//! | `$boolean` | `true` / `false`         |
//! | `$number`  | any number               |
//! | `$string`  | any string               |
//! | `$array`   | any array                |
//! | `$object`  | any object               |
//!
//! `$$` escapes the sigil, so `"$$id"` matches the literal string `"$id"`.
//! A two-element array whose first element is `"$each"` matches arrays of any
//! length whose elements all match the second element. Every other string,
//! number, boolean, and `null` is a literal.

use serde_json::Value;

use crate::error::InvalidPattern;
use crate::kind::Kind;
use crate::path::LazyPath;

const SIGIL: char = '$';
const ANY_TOKEN: &str = "any";
const EACH_TOKEN: &str = "$each";

/// A classified expectation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Matches every value.
    Any,
    /// Matches any value of the given kind.
    Kind(Kind),
    /// Matches a structurally equal value.
    Literal(Value),
    /// Matches an array element-for-element, by position.
    Array(Vec<Pattern>),
    /// Matches an array whose every element matches the inner pattern.
    Each(Box<Pattern>),
    /// Matches an object containing every listed key, in declared order.
    Object(Vec<(String, Pattern)>),
}

impl Pattern {
    /// Classify a raw pattern source.
    ///
    /// Fails only when a `$` token names no known kind or `$each` is used
    /// outside the leading position of a two-element array.
    pub fn classify(raw: &Value) -> Result<Pattern, InvalidPattern> {
        classify_at(raw, &LazyPath::Root)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Pattern::Any | Pattern::Kind(_) | Pattern::Literal(_) => 1,
            Pattern::Array(items) => 1 + items.iter().map(Pattern::size).sum::<usize>(),
            Pattern::Each(item) => 1 + item.size(),
            Pattern::Object(entries) => {
                1 + entries
                    .iter()
                    .map(|(_, pattern)| pattern.size())
                    .sum::<usize>()
            }
        }
    }
}

impl TryFrom<&Value> for Pattern {
    type Error = InvalidPattern;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        Pattern::classify(raw)
    }
}

fn classify_at(raw: &Value, path: &LazyPath<'_>) -> Result<Pattern, InvalidPattern> {
    match raw {
        Value::String(text) => classify_string(text, path),
        Value::Array(items) => classify_array(items, path),
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                let pattern = classify_at(value, &path.key(key))?;
                entries.push((key.clone(), pattern));
            }
            Ok(Pattern::Object(entries))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(Pattern::Literal(raw.clone())),
    }
}

fn classify_string(text: &str, path: &LazyPath<'_>) -> Result<Pattern, InvalidPattern> {
    let Some(body) = text.strip_prefix(SIGIL) else {
        return Ok(Pattern::Literal(Value::String(text.to_string())));
    };
    if body.starts_with(SIGIL) {
        return Ok(Pattern::Literal(Value::String(body.to_string())));
    }
    if body == ANY_TOKEN {
        return Ok(Pattern::Any);
    }
    if let Some(kind) = Kind::from_name(body) {
        return Ok(Pattern::Kind(kind));
    }
    if text == EACH_TOKEN {
        return Err(invalid(
            path,
            format!("`{EACH_TOKEN}` must be the first element of a two-element array"),
        ));
    }
    Err(invalid(
        path,
        format!("unrecognized wildcard `{text}` (use `$$` to match a literal `$`)"),
    ))
}

fn classify_array(items: &[Value], path: &LazyPath<'_>) -> Result<Pattern, InvalidPattern> {
    if let Some(Value::String(head)) = items.first() {
        if head == EACH_TOKEN {
            return match items {
                [_, element] => {
                    let element = classify_at(element, &path.index(1))?;
                    Ok(Pattern::Each(Box::new(element)))
                }
                _ => Err(invalid(
                    path,
                    format!(
                        "`{EACH_TOKEN}` expects exactly one element pattern, found {}",
                        items.len() - 1
                    ),
                )),
            };
        }
    }

    let mut patterns = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        patterns.push(classify_at(item, &path.index(index))?);
    }
    Ok(Pattern::Array(patterns))
}

fn invalid(path: &LazyPath<'_>, reason: String) -> InvalidPattern {
    InvalidPattern {
        reason,
        path: path.to_path(),
    }
}
