//! YAML document parser.

use serde_json::Value;

use crate::error::EditorError;
use crate::ports::DocumentParser;

/// Parses YAML into the JSON-shaped value model.
///
/// Mapping keys must be strings. Scalars keep their YAML types: an unquoted
/// `False` arrives as a boolean and `max-level: 40` as a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, text: &str) -> Result<Value, EditorError> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(text).map_err(|e| EditorError::parse("YAML document", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_text_is_null() {
        assert_eq!(YamlParser.parse("  \n").expect("parses"), Value::Null);
    }

    #[test]
    fn parses_saved_class_block() {
        let text = "Warrior:\n  name: 'Warrior'\n  max-level: 40\n  exp-source:\n    - 'Mob'\n  attributes:\n    health:\n      base: 20\n      scale: 0.5\n";
        let parsed = YamlParser.parse(text).expect("parses");
        assert_eq!(
            parsed,
            json!({
                "Warrior": {
                    "name": "Warrior",
                    "max-level": 40,
                    "exp-source": ["Mob"],
                    "attributes": {"health": {"base": 20, "scale": 0.5}}
                }
            })
        );
    }

    #[test]
    fn keeps_document_key_order() {
        let parsed = YamlParser.parse("Zed: {}\nAlpha: {}\n").expect("parses");
        let keys: Vec<&String> = parsed.as_object().expect("mapping").keys().collect();
        assert_eq!(keys, ["Zed", "Alpha"]);
    }

    #[test]
    fn doubled_quotes_are_unescaped() {
        let parsed = YamlParser.parse("msg: 'It''s here'\n").expect("parses");
        assert_eq!(parsed["msg"], "It's here");
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = YamlParser.parse("a: [1, 2\n").expect_err("invalid");
        assert!(matches!(err, EditorError::Parse { .. }));
    }
}
