use std::fmt;
use std::io;

use verijson_registry::RegistryError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const PATTERN_INVALID: i32 = 65;
pub const NO_INPUT: i32 = 66;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NO_INPUT,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn registry_error(context: &str, err: RegistryError) -> CliError {
    match err {
        RegistryError::LoadFailed(_) => CliError::new(NO_INPUT, format!("{context}: {err}")),
        RegistryError::InvalidPattern { .. } | RegistryError::UndecodablePattern { .. } => {
            CliError::new(PATTERN_INVALID, format!("{context}: {err}"))
        }
        RegistryError::InvalidJson(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        RegistryError::NoPattern(_) => CliError::new(USAGE, format!("{context}: {err}")),
        RegistryError::Verification { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
