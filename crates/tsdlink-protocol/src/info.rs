//! Server version document returned by info reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Build and license information reported by the server.
///
/// Unknown top-level keys are preserved in [`ServerVersion::additional`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVersion {
    /// Build details (revision, build number, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_info: Option<Map<String, Value>>,
    /// License details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<Map<String, Value>>,
    /// Any other top-level properties.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ServerVersion {
    /// Parses the version document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON object of the expected shape.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Looks up a build property rendered as text.
    #[must_use]
    pub fn build_property(&self, key: &str) -> Option<String> {
        self.build_info
            .as_ref()
            .and_then(|info| info.get(key))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let json = br#"{
            "buildInfo": {"revisionNumber": "14540", "buildNumber": 2130},
            "license": {"productVersion": "Enterprise Edition"},
            "date": {"timeZone": {"name": "UTC"}}
        }"#;
        let version = ServerVersion::from_slice(json).unwrap();
        assert_eq!(
            version.build_property("revisionNumber").as_deref(),
            Some("14540")
        );
        assert_eq!(version.build_property("buildNumber").as_deref(), Some("2130"));
        assert!(version.license.is_some());
        assert!(version.additional.contains_key("date"));
    }

    #[test]
    fn test_parse_empty_object() {
        let version = ServerVersion::from_slice(b"{}").unwrap();
        assert_eq!(version, ServerVersion::default());
    }

    #[test]
    fn test_reject_non_object() {
        assert!(ServerVersion::from_slice(b"[]").is_err());
    }
}
