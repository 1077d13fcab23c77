//! Skill components - the nested trigger/target/condition/mechanic tree
//!
//! The editor treats the component catalogue as opaque: a component is a
//! name, a kind, a list of data fields and its children. It only needs to
//! write the tree out and read it back.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::DomainError;
use crate::field::Field;
use crate::save_format::{deeper, quote};

/// Role of a component in a skill's logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Trigger,
    Target,
    Condition,
    Mechanic,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Target => "target",
            Self::Condition => "condition",
            Self::Mechanic => "mechanic",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trigger" => Ok(Self::Trigger),
            "target" => Ok(Self::Target),
            "condition" => Ok(Self::Condition),
            "mechanic" => Ok(Self::Mechanic),
            _ => Err(DomainError::parse(format!("Unknown component type: {}", s))),
        }
    }
}

/// Hands out save keys that are unique across one skill's component tree.
///
/// The first use of a name keeps it as is; later uses get `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct KeyAllocator {
    used: HashMap<String, usize>,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, name: &str) -> String {
        let count = self.used.entry(name.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            name.to_string()
        } else {
            format!("{name}-{count}")
        }
    }
}

/// Strips the uniqueness suffix added by [`KeyAllocator`].
fn base_name(key: &str) -> &str {
    match key.rsplit_once('-') {
        Some((name, suffix))
            if !name.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            name
        }
        _ => key,
    }
}

/// One node of a skill's component tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    data: Vec<Field>,
    children: Vec<Component>,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_data(mut self, field: Field) -> Self {
        self.data.push(field);
        self
    }

    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn data(&self) -> &[Field] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Field] {
        &mut self.data
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    pub fn push_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Component::count).sum::<usize>()
    }

    /// Writes this subtree. `keys` must be shared across the whole skill.
    pub fn save_string(&self, indent: &str, keys: &mut KeyAllocator) -> String {
        let inner = deeper(indent);
        let nested = deeper(&inner);
        let mut out = format!("{indent}{}:\n", keys.allocate(&self.name));
        out.push_str(&format!("{inner}type: {}\n", quote(self.kind.as_str())));
        out.push_str(&format!("{inner}data:\n"));
        for field in &self.data {
            out.push_str(&field.save_string(&nested));
        }
        if !self.children.is_empty() {
            out.push_str(&format!("{inner}children:\n"));
            for child in &self.children {
                out.push_str(&child.save_string(&nested, keys));
            }
        }
        out
    }

    /// Reads a subtree saved under `key`.
    ///
    /// Data field kinds are inferred from the parsed values. Children that
    /// fail to load are skipped.
    pub fn load(key: &str, parsed: &Value) -> Result<Self, DomainError> {
        let Value::Object(map) = parsed else {
            return Err(DomainError::malformed(format!("component '{key}' is not a mapping")));
        };
        let kind = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::malformed(format!("component '{key}' has no type")))?
            .parse::<ComponentKind>()?;

        let mut component = Self::new(base_name(key), kind);
        if let Some(Value::Object(data)) = map.get("data") {
            component.data = data
                .iter()
                .filter_map(|(data_key, value)| infer_field(data_key, value))
                .collect();
        }
        if let Some(Value::Object(children)) = map.get("children") {
            for (child_key, child) in children {
                match Self::load(child_key, child) {
                    Ok(child) => component.children.push(child),
                    Err(err) => {
                        tracing::warn!(component = key, child = %child_key, error = %err, "Skipping unreadable child component")
                    }
                }
            }
        }
        Ok(component)
    }
}

fn infer_field(key: &str, value: &Value) -> Option<Field> {
    let field = match value {
        Value::String(text) => Field::text(key, key, text.as_str()),
        Value::Bool(flag) => Field::text(key, key, flag.to_string()),
        Value::Number(n) => match n.as_i64() {
            Some(int) => Field::int(key, key, int),
            None => Field::double(key, key, n.as_f64()?),
        },
        Value::Null | Value::Array(_) => {
            Field::lines(key, key, crate::save_format::as_lines(value).unwrap_or_default())
        }
        Value::Object(parts) if parts.contains_key("base") || parts.contains_key("scale") => {
            let mut field = Field::attribute(key, key, 0.0, 0.0);
            field.load(value);
            field
        }
        Value::Object(_) => {
            tracing::debug!(key, "Dropping nested mapping from component data");
            return None;
        }
    };
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cast_tree() -> Component {
        Component::new("Cast", ComponentKind::Trigger).with_child(
            Component::new("Self", ComponentKind::Target)
                .with_child(
                    Component::new("Damage", ComponentKind::Mechanic)
                        .with_data(Field::attribute("value", "value", 3.0, 1.0))
                        .with_data(Field::text("type", "type", "Fire")),
                )
                .with_child(Component::new("Damage", ComponentKind::Mechanic)),
        )
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Mechanic".parse::<ComponentKind>(), Ok(ComponentKind::Mechanic));
        assert!("effect".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn allocator_suffixes_repeats() {
        let mut keys = KeyAllocator::new();
        assert_eq!(keys.allocate("Damage"), "Damage");
        assert_eq!(keys.allocate("Damage"), "Damage-2");
        assert_eq!(keys.allocate("Cast"), "Cast");
        assert_eq!(keys.allocate("Damage"), "Damage-3");
    }

    #[test]
    fn base_name_only_strips_numeric_suffix() {
        assert_eq!(base_name("Damage-2"), "Damage");
        assert_eq!(base_name("Value-Add"), "Value-Add");
        assert_eq!(base_name("-3"), "-3");
    }

    #[test]
    fn save_string_nests_children() {
        let saved = cast_tree().save_string("    ", &mut KeyAllocator::new());
        let expected = "    Cast:\n      type: 'trigger'\n      data:\n      children:\n        Self:\n          type: 'target'\n          data:\n          children:\n            Damage:\n              type: 'mechanic'\n              data:\n                value:\n                  base: 3\n                  scale: 1\n                type: 'Fire'\n            Damage-2:\n              type: 'mechanic'\n              data:\n";
        assert_eq!(saved, expected);
    }

    #[test]
    fn load_infers_data_kinds_and_children() {
        let parsed = json!({
            "type": "mechanic",
            "data": {
                "value": {"base": 3, "scale": 1},
                "type": "Fire",
                "radius": 2.5,
                "count": 4,
                "worlds": ["world", "nether"]
            },
            "children": {
                "Sound-2": {"type": "mechanic", "data": null},
                "Broken": {"data": {}}
            }
        });
        let component = Component::load("Damage-3", &parsed).expect("loads");
        assert_eq!(component.name(), "Damage");
        assert_eq!(component.kind(), ComponentKind::Mechanic);
        assert_eq!(component.data()[0].as_attribute(), Some((3.0, 1.0)));
        assert_eq!(component.data()[2].as_double(), Some(2.5));
        assert_eq!(component.data()[3].as_int(), Some(4));
        assert_eq!(component.data()[4].as_lines().map(<[String]>::len), Some(2));
        assert_eq!(component.children().len(), 1);
        assert_eq!(component.children()[0].name(), "Sound");
    }

    #[test]
    fn whole_double_data_keeps_fraction() {
        let component = Component::new("Push", ComponentKind::Mechanic)
            .with_data(Field::double("speed", "speed", 2.0));
        let saved = component.save_string("", &mut KeyAllocator::new());
        assert!(saved.contains("    speed: 2.0\n"));

        let reloaded = Component::load("Push", &json!({"type": "mechanic", "data": {"speed": 2.0}}))
            .expect("loads");
        assert_eq!(reloaded, component);
    }

    #[test]
    fn load_requires_type() {
        let err = Component::load("Cast", &json!({"data": {}})).unwrap_err();
        assert!(matches!(err, DomainError::Malformed(_)));
    }

    #[test]
    fn count_includes_descendants() {
        assert_eq!(cast_tree().count(), 4);
    }
}
