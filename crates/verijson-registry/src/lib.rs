//! Named JSON pattern definitions.
//!
//! Load patterns once (from JSON text, embedded strings, or a directory of
//! `<name>.pattern.json` files) and verify payloads against them by name.
//! Patterns are classified at registration, so a malformed wildcard is
//! reported when loading rather than on first use.

pub mod config;
pub mod error;
pub mod registry;
pub mod verifier;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use registry::{PatternRegistry, PATTERN_FILE_SUFFIX};
