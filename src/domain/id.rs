//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(String);

impl ProviderId {
    /// Create a new `ProviderId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the provider name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lookup key used for reliability priors: lowercase ASCII alphanumerics only.
    ///
    /// `"Lambda Labs"`, `"lambda_labs"` and `"LambdaLabs"` share the key `lambdalabs`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        provider_key(&self.0)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// GPU model identifier - newtype for type safety.
///
/// Holds whatever name the data source used until normalization rewrites it
/// to the canonical spec-table model name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new `ModelId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the model name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

pub(crate) fn provider_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_lookup_key_ignores_case_and_separators() {
        assert_eq!(ProviderId::from("Lambda Labs").lookup_key(), "lambdalabs");
        assert_eq!(ProviderId::from("lambda_labs").lookup_key(), "lambdalabs");
        assert_eq!(ProviderId::from("AWS").lookup_key(), "aws");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ModelId::from("A100")).unwrap();
        assert_eq!(json, "\"A100\"");

        let provider: ProviderId = serde_json::from_str("\"RunPod\"").unwrap();
        assert_eq!(provider.as_str(), "RunPod");
    }
}
