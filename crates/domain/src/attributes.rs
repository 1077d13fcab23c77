//! Globally configured attribute names
//!
//! Classes carry one scaling attribute per configured name. The list comes
//! from the plugin's attribute definitions file (its top-level keys) or
//! from the editor configuration.

use serde_json::Value;

use crate::error::DomainError;

/// Attribute names the plugin ships with.
pub const DEFAULT_ATTRIBUTES: [&str; 5] = ["vitality", "spirit", "intelligence", "dexterity", "strength"];

/// Ordered, case-insensitively unique attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeNames(Vec<String>);

impl AttributeNames {
    /// Builds the list, trimming names and dropping blanks and
    /// case-insensitive duplicates (first spelling wins).
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        let mut keys: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            let key = name.to_lowercase();
            if name.is_empty() || keys.contains(&key) {
                continue;
            }
            keys.push(key);
            kept.push(name.to_string());
        }
        Self(kept)
    }

    /// The plugin's default attribute set.
    pub fn standard() -> Self {
        Self::new(DEFAULT_ATTRIBUTES)
    }

    /// Reads the top-level keys of a parsed attribute definitions file.
    pub fn from_definitions(doc: &Value) -> Result<Self, DomainError> {
        match doc {
            Value::Object(map) => Ok(Self::new(map.keys())),
            Value::Null => Ok(Self::default()),
            _ => Err(DomainError::malformed(
                "attribute definitions must be a mapping of attribute names",
            )),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicates_and_blanks_are_dropped() {
        let names = AttributeNames::new(["Strength", " ", "strength", "Agility "]);
        assert_eq!(names.as_slice(), &["Strength".to_string(), "Agility".to_string()]);
    }

    #[test]
    fn non_ascii_case_variants_are_duplicates() {
        let names = AttributeNames::new(["Ärger", "ärger", "ÄRGER"]);
        assert_eq!(names.as_slice(), &["Ärger".to_string()]);
    }

    #[test]
    fn definitions_use_top_level_keys() {
        let doc = json!({
            "vitality": {"display": "Vitality", "max": 999},
            "spirit": {"display": "Spirit"}
        });
        let names = AttributeNames::from_definitions(&doc).expect("mapping");
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n == "spirit"));
    }

    #[test]
    fn definitions_must_be_a_mapping() {
        let err = AttributeNames::from_definitions(&json!(["vitality"])).unwrap_err();
        assert!(matches!(err, DomainError::Malformed(_)));
    }
}
