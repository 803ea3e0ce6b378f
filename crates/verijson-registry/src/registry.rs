use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use verijson_pattern::{MatchConfig, Matcher, ObjectPolicy, Pattern};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::verifier::{verify_payload, verify_value};

/// File name suffix recognized by [`PatternRegistry::from_directory`].
pub const PATTERN_FILE_SUFFIX: &str = ".pattern.json";

/// Name-keyed registry of classified patterns.
pub struct PatternRegistry {
    patterns: HashMap<String, Pattern>,
    config: RegistryConfig,
}

impl PatternRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            patterns: HashMap::new(),
            config,
        }
    }

    /// Register a pattern under `name` from a JSON string.
    pub fn register(&mut self, name: &str, pattern_json: &str) -> Result<()> {
        let source: Value = serde_json::from_str(pattern_json).map_err(|source| {
            RegistryError::UndecodablePattern {
                name: name.to_string(),
                source,
            }
        })?;
        self.register_value(name, &source)
    }

    /// Register a pattern under `name` from a JSON value.
    pub fn register_value(&mut self, name: &str, source: &Value) -> Result<()> {
        let pattern = Pattern::classify(source).map_err(|source| RegistryError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;

        tracing::debug!(pattern = name, nodes = pattern.size(), "registered pattern");
        self.patterns.insert(name.to_string(), pattern);
        Ok(())
    }

    /// Load patterns from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load patterns from a directory with explicit config.
    ///
    /// Every regular file named `<name>.pattern.json` is registered as
    /// `<name>`. Other files and subdirectories are skipped; symlinked
    /// pattern files are refused.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let mut loaded_pattern_count = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| RegistryError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| RegistryError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let is_pattern_file = file_name.ends_with(PATTERN_FILE_SUFFIX);
            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| RegistryError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                if is_pattern_file {
                    return Err(RegistryError::LoadFailed(format!(
                        "refusing to load pattern symlink: {file_name}"
                    )));
                }
                continue;
            }
            if !file_type.is_file() || !is_pattern_file {
                tracing::trace!(file = %file_name, "skipping non-pattern entry");
                continue;
            }

            let name = match pattern_name_from_file_name(&file_name) {
                Some(name) => name,
                None => {
                    return Err(RegistryError::LoadFailed(format!(
                        "unrecognized pattern filename: {file_name}"
                    )));
                }
            };

            loaded_pattern_count = loaded_pattern_count.saturating_add(1);
            if loaded_pattern_count > registry.config.max_patterns_from_directory {
                return Err(RegistryError::LoadFailed(format!(
                    "pattern count exceeds configured max ({}): {}",
                    registry.config.max_patterns_from_directory, loaded_pattern_count
                )));
            }

            let file = open_unchanged(&entry_path, &path_metadata)?;
            let content = read_bounded(file, registry.config.max_pattern_file_size)
                .map_err(|reason| RegistryError::LoadFailed(format!("{reason}: {file_name}")))?;
            registry.register(name, &content)?;
        }

        tracing::debug!(
            directory = %path.display(),
            count = loaded_pattern_count,
            "loaded patterns from directory"
        );
        Ok(registry)
    }

    /// Load from embedded pattern strings.
    pub fn from_embedded(patterns: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (name, pattern) in patterns {
            registry.register(name, pattern)?;
        }
        Ok(registry)
    }

    /// Verify a JSON payload against the pattern registered as `name`.
    pub fn verify(&self, name: &str, payload: &[u8]) -> Result<()> {
        match self.patterns.get(name) {
            Some(pattern) => verify_payload(name, payload, pattern, self.matcher()),
            None => self.missing(name),
        }
    }

    /// Verify a decoded value against the pattern registered as `name`.
    pub fn verify_value(&self, name: &str, value: &Value) -> Result<()> {
        match self.patterns.get(name) {
            Some(pattern) => verify_value(name, value, pattern, self.matcher()),
            None => self.missing(name),
        }
    }

    /// Look up a classified pattern.
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(name)
    }

    /// Check if a pattern is registered under `name`.
    pub fn has_pattern(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Get registered pattern names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn matcher(&self) -> Matcher {
        let object_policy = if self.config.strict_mode {
            ObjectPolicy::Strict
        } else {
            ObjectPolicy::Open
        };
        Matcher::with_config(MatchConfig { object_policy })
    }

    fn missing(&self, name: &str) -> Result<()> {
        if self.config.fail_on_missing_pattern {
            Err(RegistryError::NoPattern(name.to_string()))
        } else {
            tracing::debug!(pattern = name, "no pattern registered, accepting payload");
            Ok(())
        }
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Open `path` and confirm it is still the file `listed` was taken from.
fn open_unchanged(path: &Path, listed: &std::fs::Metadata) -> Result<File> {
    let file = File::open(path).map_err(|err| {
        RegistryError::LoadFailed(format!("failed opening pattern {}: {err}", path.display()))
    })?;

    #[cfg(unix)]
    {
        let opened = file
            .metadata()
            .map_err(|err| RegistryError::LoadFailed(err.to_string()))?;
        if !same_file_identity(listed, &opened) {
            return Err(RegistryError::LoadFailed(format!(
                "pattern file changed during load: {}",
                path.display()
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = listed;

    Ok(file)
}

/// Read at most `max_bytes` of UTF-8 text, failing if the file holds more.
///
/// The length is checked before and after reading, so a file that grows
/// between `stat` and `read` is still refused.
fn read_bounded(file: File, max_bytes: usize) -> std::result::Result<String, String> {
    let declared = file
        .metadata()
        .map_err(|err| format!("failed reading pattern metadata ({err})"))?
        .len();
    if declared > max_bytes as u64 {
        return Err(format!("pattern file too large ({declared} bytes)"));
    }

    let limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(limit)
        .read_to_string(&mut content)
        .map_err(|err| format!("failed reading pattern ({err})"))?;
    if content.len() > max_bytes {
        return Err("pattern file too large while reading".to_string());
    }
    Ok(content)
}

fn pattern_name_from_file_name(file_name: &str) -> Option<&str> {
    let name = file_name.strip_suffix(PATTERN_FILE_SUFFIX)?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    valid.then_some(name)
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    const USER_PATTERN: &str = r#"{
        "id": "$number",
        "name": "$string",
        "roles": ["$each", "$string"]
    }"#;

    #[test]
    fn register_and_verify() {
        let mut registry = PatternRegistry::new();
        registry.register("user", USER_PATTERN).unwrap();

        assert!(registry
            .verify("user", br#"{"id":1,"name":"ok","roles":["admin"]}"#)
            .is_ok());
        assert!(matches!(
            registry.verify("user", br#"{"id":"bad","name":"ok","roles":[]}"#),
            Err(RegistryError::Verification { .. })
        ));
    }

    #[test]
    fn verification_error_carries_code_and_path() {
        let mut registry = PatternRegistry::new();
        registry.register("user", USER_PATTERN).unwrap();

        let err = registry
            .verify_value("user", &json!({"id": 1, "name": "ok", "roles": ["a", 2]}))
            .unwrap_err();
        match err {
            RegistryError::Verification { name, source } => {
                assert_eq!(name, "user");
                assert_eq!(source.code(), "kind_mismatch");
                assert_eq!(source.path().to_string(), "/roles/1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn multiple_patterns_independent_verification() {
        let mut registry = PatternRegistry::new();
        registry.register("a", r#"{"a":"$number"}"#).unwrap();
        registry.register("b", r#"{"b":"$string"}"#).unwrap();
        registry.register("flags", r#"["$each","$boolean"]"#).unwrap();

        assert!(registry.verify("a", br#"{"a":7}"#).is_ok());
        assert!(registry.verify("b", br#"{"b":"v"}"#).is_ok());
        assert!(registry.verify("flags", br#"[true,false]"#).is_ok());

        assert!(registry.verify("a", br#"{"a":"x"}"#).is_err());
        assert!(registry.verify("b", br#"{"b":10}"#).is_err());
        assert!(registry.verify("flags", br#"[true,1]"#).is_err());
    }

    #[test]
    fn missing_pattern_permissive_passes() {
        let registry = PatternRegistry::new();
        assert!(registry.verify("unknown", br#"{"any":"thing"}"#).is_ok());
    }

    #[test]
    fn missing_pattern_strict_fails() {
        let registry = PatternRegistry::with_config(RegistryConfig {
            fail_on_missing_pattern: true,
            ..RegistryConfig::default()
        });

        assert!(matches!(
            registry.verify("unknown", br#"{}"#),
            Err(RegistryError::NoPattern(name)) if name == "unknown"
        ));
    }

    #[test]
    fn strict_mode_rejects_undeclared_keys() {
        let mut permissive = PatternRegistry::new();
        permissive.register("user", USER_PATTERN).unwrap();

        let mut strict = PatternRegistry::with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        strict.register("user", USER_PATTERN).unwrap();

        let payload = br#"{"id":1,"name":"ok","roles":[],"extra":true}"#;
        assert!(permissive.verify("user", payload).is_ok());
        assert!(matches!(
            strict.verify("user", payload),
            Err(RegistryError::Verification { .. })
        ));
    }

    #[test]
    fn invalid_json_payload_fails() {
        let mut registry = PatternRegistry::new();
        registry.register("user", USER_PATTERN).unwrap();

        assert!(matches!(
            registry.verify("user", b"not-json"),
            Err(RegistryError::InvalidJson(_))
        ));
    }

    #[test]
    fn malformed_wildcard_fails_registration() {
        let mut registry = PatternRegistry::new();

        let err = registry
            .register("bad", r#"{"type":"$definitely-not-a-kind"}"#)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { ref name, .. } if name == "bad"));
        assert!(!registry.has_pattern("bad"));
    }

    #[test]
    fn from_embedded_loads_patterns() {
        let registry = PatternRegistry::from_embedded(&[
            ("user", USER_PATTERN),
            ("ping", r#"{"op":"ping"}"#),
        ])
        .unwrap();

        assert!(registry.has_pattern("user"));
        assert!(registry.has_pattern("ping"));
        assert_eq!(registry.names(), vec!["ping", "user"]);
        assert!(registry.get("ping").is_some());
    }

    #[test]
    fn from_directory_loads_and_verifies() {
        let dir = make_temp_pattern_dir("from-directory");

        write_pattern(&dir, "user.pattern.json", USER_PATTERN);
        write_pattern(&dir, "ids.pattern.json", r#"["$each","$number"]"#);

        let registry = PatternRegistry::from_directory(&dir).unwrap();
        assert!(registry
            .verify("user", br#"{"id":5,"name":"ok","roles":[]}"#)
            .is_ok());
        assert!(registry.verify("ids", br#"[1,2,3]"#).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_directory_surfaces_invalid_pattern() {
        let dir = make_temp_pattern_dir("invalid-pattern");
        write_pattern(&dir, "broken.pattern.json", r#"{"x":"$strng"}"#);

        let result = PatternRegistry::from_directory(&dir);
        assert!(matches!(result, Err(RegistryError::InvalidPattern { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_directory_names_undecodable_pattern() {
        let dir = make_temp_pattern_dir("undecodable-pattern");
        write_pattern(&dir, "torn.pattern.json", r#"{"x":"#);

        let err = PatternRegistry::from_directory(&dir).err().unwrap();
        assert!(matches!(err, RegistryError::UndecodablePattern { ref name, .. } if name == "torn"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_bounded_accepts_exact_limit_and_refuses_more() {
        let dir = make_temp_pattern_dir("read-bounded");
        write_pattern(&dir, "eight.pattern.json", "\"$any\"  ");
        let path = dir.join("eight.pattern.json");

        let content = read_bounded(File::open(&path).unwrap(), 8).unwrap();
        assert_eq!(content, "\"$any\"  ");

        let err = read_bounded(File::open(&path).unwrap(), 7).unwrap_err();
        assert!(err.contains("too large"), "{err}");

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn make_temp_pattern_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "verijson-registry-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_pattern(dir: &Path, file_name: &str, contents: &str) {
        let path = dir.join(file_name);
        std::fs::write(path, contents.as_bytes()).unwrap();
    }

    #[test]
    fn config_access_and_directory_bad_pattern_name_errors() {
        let config = RegistryConfig {
            strict_mode: true,
            fail_on_missing_pattern: true,
            max_patterns_from_directory: 256,
            max_pattern_file_size: 256 * 1024,
        };
        let registry = PatternRegistry::with_config(config);
        assert_eq!(registry.config(), &config);

        let dir = make_temp_pattern_dir("bad-name");
        write_pattern(&dir, "with space.pattern.json", USER_PATTERN);
        let result = PatternRegistry::from_directory(&dir);
        assert!(matches!(result, Err(RegistryError::LoadFailed(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn only_pattern_files_are_loaded() {
        let dir = make_temp_pattern_dir("extensions");
        write_pattern(&dir, "user.pattern.json", USER_PATTERN);
        write_pattern(&dir, "ignored.json", USER_PATTERN);
        write_pattern(&dir, "notes.txt", "not json at all");
        std::fs::create_dir_all(dir.join("nested.pattern.json")).unwrap();

        let registry = PatternRegistry::from_directory(&dir).unwrap();
        assert_eq!(registry.names(), vec!["user"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_pattern_is_rejected() {
        let dir = make_temp_pattern_dir("symlink-pattern");
        let target = dir.join("target.json");
        std::fs::write(&target, USER_PATTERN.as_bytes()).unwrap();
        let link = dir.join("user.pattern.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = PatternRegistry::from_directory(&dir);
        assert!(matches!(result, Err(RegistryError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn pattern_count_limit_is_enforced() {
        let dir = make_temp_pattern_dir("pattern-count-limit");
        write_pattern(&dir, "one.pattern.json", USER_PATTERN);
        write_pattern(&dir, "two.pattern.json", USER_PATTERN);

        let config = RegistryConfig {
            max_patterns_from_directory: 1,
            ..RegistryConfig::default()
        };
        let result = PatternRegistry::from_directory_with_config(&dir, config);
        assert!(matches!(result, Err(RegistryError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn pattern_file_size_limit_is_enforced() {
        let dir = make_temp_pattern_dir("pattern-size-limit");
        write_pattern(&dir, "user.pattern.json", USER_PATTERN);

        let config = RegistryConfig {
            max_pattern_file_size: 8,
            ..RegistryConfig::default()
        };
        let result = PatternRegistry::from_directory_with_config(&dir, config);
        assert!(matches!(result, Err(RegistryError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parser_recognizes_pattern_names() {
        assert_eq!(pattern_name_from_file_name("user.pattern.json"), Some("user"));
        assert_eq!(
            pattern_name_from_file_name("api.v2_order-line.pattern.json"),
            Some("api.v2_order-line")
        );
        assert_eq!(pattern_name_from_file_name(".pattern.json"), None);
        assert_eq!(pattern_name_from_file_name("a b.pattern.json"), None);
        assert_eq!(pattern_name_from_file_name("user.json"), None);
    }

    #[cfg(unix)]
    #[test]
    fn same_file_identity_distinguishes_replaced_file() {
        let dir = make_temp_pattern_dir("identity-check");
        let first = dir.join("first.json");
        let second = dir.join("second.json");
        std::fs::write(&first, USER_PATTERN).unwrap();
        std::fs::write(&second, USER_PATTERN).unwrap();

        let first_meta = std::fs::symlink_metadata(&first).unwrap();
        let opened_first_meta = std::fs::File::open(&first).unwrap().metadata().unwrap();
        let opened_second_meta = std::fs::File::open(&second).unwrap().metadata().unwrap();

        assert!(same_file_identity(&first_meta, &opened_first_meta));
        assert!(!same_file_identity(&first_meta, &opened_second_meta));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
