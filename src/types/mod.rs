//! Core value types shared across the client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered collection of non-fatal, human-readable messages emitted by the
/// control plane alongside a response.
///
/// Warnings are append-only within one logical operation and concatenable
/// across sequential operations, such as the pages of one list call. Order
/// of appearance is preserved and no deduplication is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// Creates an empty warning collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single warning.
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Appends all warnings from `other`, preserving their order.
    pub fn extend(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    /// Returns true if no warnings were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of collected warnings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the warnings in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// The warnings as a slice, in emission order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the collection and returns the underlying strings.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(warnings: Vec<String>) -> Self {
        Self(warnings)
    }
}

impl FromIterator<String> for Warnings {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Opaque reference to a server-side asynchronous job, surfaced verbatim
/// from the resource-location header of a response.
///
/// Validity is defined entirely by the server's bookkeeping; the client
/// only carries the handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wraps a raw job reference.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl From<&str> for JobHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

/// A named feature toggle on the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// Flag name.
    #[serde(default)]
    pub name: String,
    /// Whether the flag is enabled.
    #[serde(default)]
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_preserve_order() {
        let mut warnings = Warnings::new();
        warnings.push("w1");
        warnings.push("w2");
        warnings.push("w1");

        assert_eq!(warnings.as_slice(), &["w1", "w2", "w1"]);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_warnings_extend_concatenates() {
        let mut first: Warnings = vec!["a".to_string(), "b".to_string()].into();
        let second: Warnings = vec!["c".to_string()].into();

        first.extend(second);

        assert_eq!(first.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_empty_warnings() {
        let warnings = Warnings::new();
        assert!(warnings.is_empty());
        assert_eq!(warnings.len(), 0);
    }

    #[test]
    fn test_job_handle_roundtrip() {
        let handle = JobHandle::from("https://api.example.com/v3/jobs/abc-123");
        assert_eq!(handle.as_str(), "https://api.example.com/v3/jobs/abc-123");
        assert_eq!(handle.to_string(), "https://api.example.com/v3/jobs/abc-123");
    }

    #[test]
    fn test_feature_flag_defaults_missing_fields() {
        let flag: FeatureFlag = serde_json::from_str(r#"{"name":"custom_flag"}"#).unwrap();
        assert_eq!(flag.name, "custom_flag");
        assert!(!flag.enabled);
    }

    #[test]
    fn test_feature_flag_ignores_unknown_fields() {
        let flag: FeatureFlag =
            serde_json::from_str(r#"{"name":"f","enabled":true,"updated_at":"2024-01-01"}"#)
                .unwrap();
        assert_eq!(flag.name, "f");
        assert!(flag.enabled);
    }
}
