/// Controls registry loading and verification behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, object patterns reject keys they do not declare.
    pub strict_mode: bool,
    /// When true, names without a pattern return `RegistryError::NoPattern`.
    pub fail_on_missing_pattern: bool,
    /// Maximum number of patterns loaded from a directory.
    pub max_patterns_from_directory: usize,
    /// Maximum bytes allowed per pattern file loaded from a directory.
    pub max_pattern_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            fail_on_missing_pattern: false,
            max_patterns_from_directory: 256,
            max_pattern_file_size: 256 * 1024,
        }
    }
}
