//! Verify decoded JSON values against declarative pattern trees.
//!
//! A pattern is itself a JSON value: literals must match exactly, `$`-prefixed
//! wildcard tokens such as `"$string"` match any value of a kind, and arrays
//! and objects describe nested shapes. Verification happens in two phases:
//!
//! 1. [`Pattern::classify`] turns the raw pattern into a closed [`Pattern`]
//!    tree, rejecting malformed wildcards up front.
//! 2. [`Matcher::check`] walks the value and pattern together and returns the
//!    first [`Mismatch`] in canonical order.
//!
//! [`verify`] runs both and renders failures as a [`VerificationError`].
//!
//! ```
//! use serde_json::json;
//!
//! let pattern = json!({"id": "$number", "tags": ["$each", "$string"]});
//! assert!(verijson_pattern::verify(&json!({"id": 1, "tags": ["a"]}), &pattern).is_ok());
//!
//! let err = verijson_pattern::verify(&json!({"id": "1", "tags": []}), &pattern).unwrap_err();
//! assert_eq!(err.code(), "kind_mismatch");
//! assert_eq!(err.path().to_string(), "/id");
//! ```

pub mod config;
pub mod equal;
pub mod error;
pub mod kind;
pub mod matcher;
pub mod mismatch;
pub mod path;
pub mod pattern;
mod verify;

pub use config::{MatchConfig, ObjectPolicy};
pub use equal::equal;
pub use error::{InvalidPattern, Result, VerificationError};
pub use kind::Kind;
pub use matcher::Matcher;
pub use mismatch::{describe, Mismatch, MismatchKind};
pub use path::{Path, Segment};
pub use pattern::Pattern;
pub use verify::{verify, verify_with_config};
