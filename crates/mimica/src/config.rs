//! Mock configuration
//!
//! Defaults shared by the mocks a [`MockRepository`](crate::MockRepository)
//! creates. Loadable from YAML or JSON:
//!
//! ```yaml
//! behavior: strict
//! max_recorded_invocations: 500
//! verify_on_drop: all
//! ```

use crate::mock::MockBehavior;
use crate::result::{MockError, MockResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Verification run when a repository is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyOnDrop {
    /// No verification
    #[default]
    Off,
    /// `verify`: setups marked verifiable
    Verifiable,
    /// `verify_all`: every setup
    All,
}

/// Configuration for mocks and repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Behavior for unmatched calls
    pub behavior: MockBehavior,
    /// Invocation log capacity; oldest entries are dropped first
    pub max_recorded_invocations: usize,
    /// Verification run when the repository is dropped
    pub verify_on_drop: VerifyOnDrop,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            behavior: MockBehavior::Loose,
            max_recorded_invocations: 10_000,
            verify_on_drop: VerifyOnDrop::Off,
        }
    }
}

impl MockConfig {
    /// Create a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the behavior for unmatched calls
    #[must_use]
    pub const fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the invocation log capacity (0 disables recording)
    #[must_use]
    pub const fn with_max_recorded_invocations(mut self, max: usize) -> Self {
        self.max_recorded_invocations = max;
        self
    }

    /// Set the verification run on repository drop
    #[must_use]
    pub const fn with_verify_on_drop(mut self, mode: VerifyOnDrop) -> Self {
        self.verify_on_drop = mode;
        self
    }

    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> MockResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse from JSON
    pub fn from_json_str(json: &str) -> MockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> MockResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(MockError::Config {
                message: format!(
                    "unsupported config file {}; expected .yaml, .yml or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> MockResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MockConfig::default();
        assert_eq!(config.behavior, MockBehavior::Loose);
        assert_eq!(config.max_recorded_invocations, 10_000);
        assert_eq!(config.verify_on_drop, VerifyOnDrop::Off);
    }

    #[test]
    fn test_builder() {
        let config = MockConfig::new()
            .with_behavior(MockBehavior::Strict)
            .with_max_recorded_invocations(5)
            .with_verify_on_drop(VerifyOnDrop::All);
        assert_eq!(config.behavior, MockBehavior::Strict);
        assert_eq!(config.max_recorded_invocations, 5);
        assert_eq!(config.verify_on_drop, VerifyOnDrop::All);
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = MockConfig::from_yaml_str("behavior: strict\n").unwrap();
        assert_eq!(config.behavior, MockBehavior::Strict);
        assert_eq!(config.max_recorded_invocations, 10_000);
    }

    #[test]
    fn test_json() {
        let config =
            MockConfig::from_json_str(r#"{"verify_on_drop": "verifiable", "behavior": "loose"}"#)
                .unwrap();
        assert_eq!(config.verify_on_drop, VerifyOnDrop::Verifiable);
        assert_eq!(config.behavior, MockBehavior::Loose);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MockConfig::new().with_behavior(MockBehavior::Strict);
        let yaml = config.to_yaml().unwrap();
        assert_eq!(MockConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_behavior_rejected() {
        let err = MockConfig::from_yaml_str("behavior: lenient\n").unwrap_err();
        assert!(matches!(err, MockError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mocks.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "behavior: strict").unwrap();
        writeln!(file, "max_recorded_invocations: 3").unwrap();

        let config = MockConfig::from_file(&path).unwrap();
        assert_eq!(config.behavior, MockBehavior::Strict);
        assert_eq!(config.max_recorded_invocations, 3);
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mocks.toml");
        std::fs::write(&path, "behavior = 'strict'").unwrap();
        let err = MockConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, MockError::Config { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = MockConfig::from_file("/nonexistent/mocks.yaml").unwrap_err();
        assert!(matches!(err, MockError::Io(_)));
    }
}
