//! Field descriptors
//!
//! A [`Field`] is a self-describing editable value: it knows its label,
//! its save-format key, how to render itself into a [`FieldView`], how to
//! read the user's edits back, and how to write and load its line(s) of
//! the save format. Kinds form a closed set ([`FieldValue`]) and every
//! operation dispatches on it with a single `match`.

use serde_json::Value;

use crate::save_format::{self, deeper, quote};
use crate::view::{ControlId, ControlKind, ControlSpec, ControlState, FieldView, Section};

/// Where a choice field's options come from.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSource {
    /// A list owned by the field (may be refreshed by the entity)
    Fixed(Vec<String>),
    /// The external material catalogue, resolved when rendering
    Materials,
}

/// Kind-specific value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Double(f64),
    /// One option out of a list
    Choice {
        options: OptionSource,
        selected: String,
    },
    /// Any subset of up to 32 options, stored as a bitmask
    ByteFlags { options: Vec<String>, mask: u32 },
    StringList(Vec<String>),
    /// Value at level 1 and per-level increment
    Attribute { base: f64, scale: f64 },
}

/// A single editable field of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    label: String,
    key: String,
    tooltip: Option<String>,
    section: Section,
    value: FieldValue,
}

impl Field {
    fn new(label: impl Into<String>, key: impl Into<String>, value: FieldValue) -> Self {
        let section = match value {
            FieldValue::Attribute { .. } => Section::Attributes,
            _ => Section::Root,
        };
        Self {
            label: label.into(),
            key: key.into(),
            tooltip: None,
            section,
            value,
        }
    }

    pub fn text(label: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, key, FieldValue::Text(value.into()))
    }

    pub fn int(label: impl Into<String>, key: impl Into<String>, value: i64) -> Self {
        Self::new(label, key, FieldValue::Int(value))
    }

    pub fn double(label: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self::new(label, key, FieldValue::Double(value))
    }

    pub fn choice(
        label: impl Into<String>,
        key: impl Into<String>,
        options: &[&str],
        selected: impl Into<String>,
    ) -> Self {
        let options = OptionSource::Fixed(options.iter().map(|o| o.to_string()).collect());
        Self::new(
            label,
            key,
            FieldValue::Choice {
                options,
                selected: selected.into(),
            },
        )
    }

    /// A choice over the material catalogue.
    pub fn material(label: impl Into<String>, key: impl Into<String>, selected: impl Into<String>) -> Self {
        Self::new(
            label,
            key,
            FieldValue::Choice {
                options: OptionSource::Materials,
                selected: selected.into(),
            },
        )
    }

    pub fn flags(label: impl Into<String>, key: impl Into<String>, options: &[&str], mask: u32) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(label, key, FieldValue::ByteFlags { options, mask })
    }

    pub fn lines<S: Into<String>>(
        label: impl Into<String>,
        key: impl Into<String>,
        lines: impl IntoIterator<Item = S>,
    ) -> Self {
        let lines = lines.into_iter().map(Into::into).collect();
        Self::new(label, key, FieldValue::StringList(lines))
    }

    pub fn attribute(label: impl Into<String>, key: impl Into<String>, base: f64, scale: f64) -> Self {
        Self::new(label, key, FieldValue::Attribute { base, scale })
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Moves the field to another block of the save format.
    pub fn in_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn id(&self) -> ControlId {
        ControlId::new(self.section, self.key.clone())
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.value, FieldValue::Attribute { .. })
    }

    /// Text of a text field or the selected option of a choice.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::Choice { selected, .. } => Some(selected),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            FieldValue::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            FieldValue::Double(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match &self.value {
            FieldValue::StringList(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_mask(&self) -> Option<u32> {
        match self.value {
            FieldValue::ByteFlags { mask, .. } => Some(mask),
            _ => None,
        }
    }

    /// `(base, scale)` of an attribute field.
    pub fn as_attribute(&self) -> Option<(f64, f64)> {
        match self.value {
            FieldValue::Attribute { base, scale } => Some((base, scale)),
            _ => None,
        }
    }

    /// Selected option names of a flags field, in option order.
    pub fn selected_flags(&self) -> Vec<&str> {
        match &self.value {
            FieldValue::ByteFlags { options, mask } => options
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < 32 && *mask & (1u32 << *i) != 0)
                .map(|(_, o)| o.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Sets a text field or the selection of a choice. Returns `false` for
    /// other kinds.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.value {
            FieldValue::Text(value) | FieldValue::Choice { selected: value, .. } => {
                *value = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_attribute(&mut self, base: f64, scale: f64) -> bool {
        match &mut self.value {
            FieldValue::Attribute { base: b, scale: s } => {
                *b = base;
                *s = scale;
                true
            }
            _ => false,
        }
    }

    pub fn set_lines(&mut self, lines: Vec<String>) -> bool {
        match &mut self.value {
            FieldValue::StringList(value) => {
                *value = lines;
                true
            }
            _ => false,
        }
    }

    /// Replaces the options of a fixed-list choice. The current selection
    /// is kept even if it is no longer listed.
    pub fn set_options(&mut self, new_options: Vec<String>) -> bool {
        match &mut self.value {
            FieldValue::Choice {
                options: OptionSource::Fixed(options),
                ..
            } => {
                *options = new_options;
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Form
    // =========================================================================

    /// Appends this field's control to the view.
    pub fn render(&self, view: &mut dyn FieldView, materials: &[String]) {
        let kind = match &self.value {
            FieldValue::Text(value) => ControlKind::Text {
                value: value.clone(),
            },
            FieldValue::Int(n) => ControlKind::Number {
                value: n.to_string(),
            },
            FieldValue::Double(n) => ControlKind::Number {
                value: save_format::number(*n),
            },
            FieldValue::Choice { options, selected } => ControlKind::Select {
                options: match options {
                    OptionSource::Fixed(options) => options.clone(),
                    OptionSource::Materials => materials.to_vec(),
                },
                selected: selected.clone(),
            },
            FieldValue::ByteFlags { options, mask } => ControlKind::Flags {
                options: options.clone(),
                checked: (0..options.len())
                    .map(|i| i < 32 && *mask & (1u32 << i) != 0)
                    .collect(),
            },
            FieldValue::StringList(lines) => ControlKind::Lines {
                lines: lines.clone(),
            },
            FieldValue::Attribute { base, scale } => ControlKind::Pair {
                base: save_format::number(*base),
                scale: save_format::number(*scale),
            },
        };
        view.control(ControlSpec {
            id: self.id(),
            label: self.label.clone(),
            tooltip: self.tooltip.clone(),
            kind,
        });
    }

    /// Pulls the control's current state into the value.
    ///
    /// A control that was never rendered leaves the value alone. Bad
    /// numeric input never fails: empty boxes read as `0`, anything else
    /// unparseable keeps the previous value.
    pub fn read_from(&mut self, view: &dyn FieldView) {
        let Some(state) = view.read(&self.id()) else {
            return;
        };
        match (&mut self.value, state) {
            (FieldValue::Text(value), ControlState::Text(text)) => *value = text,
            (FieldValue::Int(value), ControlState::Text(text)) => *value = read_int(&text, *value),
            (FieldValue::Double(value), ControlState::Text(text)) => {
                *value = read_double(&text, *value)
            }
            (FieldValue::Choice { options, selected }, ControlState::Text(text)) => {
                let listed = match options {
                    OptionSource::Fixed(options) => options.iter().any(|o| *o == text),
                    OptionSource::Materials => true,
                };
                if listed {
                    *selected = text;
                }
            }
            (FieldValue::ByteFlags { options, mask }, ControlState::Checks(checked)) => {
                *mask = checked
                    .iter()
                    .take(options.len().min(32))
                    .enumerate()
                    .filter(|(_, on)| **on)
                    .fold(0u32, |acc, (i, _)| acc | (1u32 << i));
            }
            (FieldValue::StringList(lines), ControlState::Text(text)) => {
                *lines = if text.is_empty() {
                    Vec::new()
                } else {
                    text.split('\n')
                        .map(|line| line.trim_end_matches('\r').to_string())
                        .collect()
                };
            }
            (FieldValue::Attribute { base, scale }, ControlState::Pair { base: b, scale: s }) => {
                *base = read_double(&b, *base);
                *scale = read_double(&s, *scale);
            }
            (_, state) => {
                tracing::trace!(key = %self.key, ?state, "Ignoring control state of the wrong shape");
            }
        }
    }

    // =========================================================================
    // Save format
    // =========================================================================

    /// This field's contribution to the save format at the given indent.
    pub fn save_string(&self, indent: &str) -> String {
        let key = &self.key;
        match &self.value {
            FieldValue::Text(text) => format!("{indent}{key}: {}\n", quote(text)),
            FieldValue::Int(n) => format!("{indent}{key}: {n}\n"),
            FieldValue::Double(n) => format!("{indent}{key}: {}\n", save_format::decimal(*n)),
            FieldValue::Choice { selected, .. } => format!("{indent}{key}: {}\n", quote(selected)),
            FieldValue::ByteFlags { .. } => list_block(indent, key, self.selected_flags()),
            FieldValue::StringList(lines) => list_block(indent, key, lines.iter().map(String::as_str)),
            FieldValue::Attribute { base, scale } => {
                let inner = deeper(indent);
                format!(
                    "{indent}{key}:\n{inner}base: {}\n{inner}scale: {}\n",
                    save_format::number(*base),
                    save_format::number(*scale)
                )
            }
        }
    }

    /// Applies a parsed value. Returns `false` and keeps the current value
    /// when the parsed shape does not fit this kind.
    pub fn load(&mut self, parsed: &Value) -> bool {
        match &mut self.value {
            FieldValue::Text(value) => assign(value, save_format::as_text(parsed)),
            FieldValue::Int(value) => assign(value, save_format::as_i64(parsed)),
            FieldValue::Double(value) => assign(value, save_format::as_f64(parsed)),
            FieldValue::Choice { options, selected } => {
                let Some(text) = save_format::as_text(parsed) else {
                    return false;
                };
                // Match listed options ignoring case so `false` reads as `False`.
                *selected = match options {
                    OptionSource::Fixed(options) => options
                        .iter()
                        .find(|o| o.eq_ignore_ascii_case(&text))
                        .cloned()
                        .unwrap_or(text),
                    OptionSource::Materials => text,
                };
                true
            }
            FieldValue::ByteFlags { options, mask } => {
                let limit = if options.len() >= 32 {
                    u32::MAX
                } else {
                    (1u32 << options.len()) - 1
                };
                match parsed {
                    Value::Number(n) => match n.as_u64() {
                        Some(bits) => {
                            *mask = (bits as u32) & limit;
                            true
                        }
                        None => false,
                    },
                    Value::Null | Value::Array(_) => {
                        let names = save_format::as_lines(parsed).unwrap_or_default();
                        *mask = options
                            .iter()
                            .take(32)
                            .enumerate()
                            .filter(|(_, o)| names.iter().any(|n| n.eq_ignore_ascii_case(o)))
                            .fold(0u32, |acc, (i, _)| acc | (1u32 << i));
                        true
                    }
                    _ => false,
                }
            }
            FieldValue::StringList(lines) => assign(lines, save_format::as_lines(parsed)),
            FieldValue::Attribute { base, scale } => match parsed {
                Value::Object(parts) => {
                    let mut applied = false;
                    if let Some(b) = parts.get("base").and_then(save_format::as_f64) {
                        *base = b;
                        applied = true;
                    }
                    if let Some(s) = parts.get("scale").and_then(save_format::as_f64) {
                        *scale = s;
                        applied = true;
                    }
                    applied
                }
                other => assign(base, save_format::as_f64(other)),
            },
        }
    }

    /// Applies the plugin's compact `<key>-base` / `<key>-scale` pair.
    pub fn load_compact(&mut self, base: Option<&Value>, scale: Option<&Value>) -> bool {
        let FieldValue::Attribute { base: b, scale: s } = &mut self.value else {
            return false;
        };
        let loaded_base = assign(b, base.and_then(save_format::as_f64));
        let loaded_scale = assign(s, scale.and_then(save_format::as_f64));
        loaded_base || loaded_scale
    }
}

fn assign<T>(slot: &mut T, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn list_block<'a>(indent: &str, key: &str, items: impl IntoIterator<Item = &'a str>) -> String {
    let inner = deeper(indent);
    let mut out = format!("{indent}{key}:\n");
    for item in items {
        out.push_str(&format!("{inner}- {}\n", quote(item)));
    }
    out
}

fn read_int(text: &str, previous: i64) -> i64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    text.parse::<i64>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
        .unwrap_or(previous)
}

fn read_double(text: &str, previous: f64) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::FormBuffer;
    use serde_json::json;

    fn rendered(field: &Field) -> FormBuffer {
        let mut form = FormBuffer::new();
        field.render(&mut form, &["Stone".to_string(), "Jack O Lantern".to_string()]);
        form
    }

    #[test]
    fn attribute_fields_default_to_attribute_section() {
        assert_eq!(Field::attribute("Health", "health", 20.0, 0.0).section(), Section::Attributes);
        assert_eq!(Field::text("Name", "name", "x").section(), Section::Root);
        assert_eq!(
            Field::lines("Incompatible", "incompatible", Vec::<String>::new())
                .in_section(Section::Attributes)
                .section(),
            Section::Attributes
        );
    }

    #[test]
    fn read_without_control_is_noop() {
        let mut field = Field::int("Max Level", "max-level", 40);
        field.read_from(&FormBuffer::new());
        assert_eq!(field.as_int(), Some(40));
    }

    #[test]
    fn bad_numeric_input_keeps_previous_value() {
        let mut field = Field::int("Max Level", "max-level", 40);
        let mut form = rendered(&field);

        form.set_text("max-level", "forty");
        field.read_from(&form);
        assert_eq!(field.as_int(), Some(40));

        form.set_text("max-level", "  ");
        field.read_from(&form);
        assert_eq!(field.as_int(), Some(0));

        form.set_text("max-level", "12.7");
        field.read_from(&form);
        assert_eq!(field.as_int(), Some(12));
    }

    #[test]
    fn attribute_pair_reads_each_box_independently() {
        let mut field = Field::attribute("Health", "health", 20.0, 1.0);
        let mut form = rendered(&field);
        form.set_pair("health", "25.5", "oops");
        field.read_from(&form);
        assert_eq!(field.as_attribute(), Some((25.5, 1.0)));
    }

    #[test]
    fn choice_rejects_unlisted_option() {
        let mut field = Field::choice("Permission", "needs-permission", &["True", "False"], "False");
        let mut form = rendered(&field);

        form.set_text("needs-permission", "Maybe");
        field.read_from(&form);
        assert_eq!(field.as_text(), Some("False"));

        form.set_text("needs-permission", "True");
        field.read_from(&form);
        assert_eq!(field.as_text(), Some("True"));
    }

    #[test]
    fn material_choice_renders_catalogue() {
        let field = Field::material("Icon", "icon", "Jack O Lantern");
        let form = rendered(&field);
        let spec = form.find_control(&ControlId::root("icon")).expect("icon control");
        assert!(matches!(
            &spec.kind,
            ControlKind::Select { options, selected } if options.len() == 2 && selected == "Jack O Lantern"
        ));
    }

    #[test]
    fn flags_read_checkboxes_into_mask() {
        let mut field = Field::flags("Exp", "exp-source", &["Mob", "Break", "Place"], 0b001);
        let mut form = rendered(&field);
        form.edit(
            &ControlId::root("exp-source"),
            ControlState::Checks(vec![false, true, true, true]),
        );
        field.read_from(&form);
        assert_eq!(field.as_mask(), Some(0b110));
        assert_eq!(field.selected_flags(), vec!["Break", "Place"]);
    }

    #[test]
    fn string_list_splits_lines() {
        let mut field = Field::lines("Lore", "icon-lore", ["old"]);
        let mut form = rendered(&field);
        form.set_text("icon-lore", "&dMage\r\n\n&7Casts things");
        field.read_from(&form);
        assert_eq!(
            field.as_lines(),
            Some(&["&dMage".to_string(), String::new(), "&7Casts things".to_string()][..])
        );

        form.set_text("icon-lore", "");
        field.read_from(&form);
        assert_eq!(field.as_lines(), Some(&[][..]));
    }

    #[test]
    fn scalar_save_lines() {
        assert_eq!(Field::text("P", "prefix", "&6Mage").save_string("  "), "  prefix: '&6Mage'\n");
        assert_eq!(Field::int("M", "max-level", 40).save_string("  "), "  max-level: 40\n");
        assert_eq!(Field::double("R", "mana-regen", 1.0).save_string("  "), "  mana-regen: 1.0\n");
        assert_eq!(
            Field::choice("T", "tree", &["Flood", "Requirement"], "Requirement").save_string("  "),
            "  tree: 'Requirement'\n"
        );
    }

    #[test]
    fn block_save_lines() {
        assert_eq!(
            Field::lines("S", "skills", ["Fireball", "Blink"]).save_string("  "),
            "  skills:\n    - 'Fireball'\n    - 'Blink'\n"
        );
        assert_eq!(
            Field::flags("E", "exp-source", &["Mob", "Break", "Place"], 0b101).save_string("  "),
            "  exp-source:\n    - 'Mob'\n    - 'Place'\n"
        );
        assert_eq!(
            Field::attribute("H", "health", 20.0, 2.5).save_string("    "),
            "    health:\n      base: 20\n      scale: 2.5\n"
        );
    }

    #[test]
    fn flags_load_from_plugin_bitmask() {
        let mut field = Field::flags("E", "exp-source", &["Mob", "Break", "Place"], 0);
        assert!(field.load(&json!(0b1111_0101)));
        assert_eq!(field.as_mask(), Some(0b101));

        assert!(field.load(&json!(["break"])));
        assert_eq!(field.as_mask(), Some(0b010));
    }

    #[test]
    fn choice_load_matches_case_insensitively() {
        let mut field = Field::choice("Permission", "needs-permission", &["True", "False"], "False");
        assert!(field.load(&json!(true)));
        assert_eq!(field.as_text(), Some("True"));
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let mut field = Field::int("M", "max-level", 40);
        assert!(!field.load(&json!(["a"])));
        assert_eq!(field.as_int(), Some(40));
    }

    #[test]
    fn attribute_loads_nested_and_compact_forms() {
        let mut field = Field::attribute("H", "health", 20.0, 0.0);
        assert!(field.load(&json!({"base": 30, "scale": 1.5})));
        assert_eq!(field.as_attribute(), Some((30.0, 1.5)));

        assert!(field.load_compact(Some(&json!(12)), None));
        assert_eq!(field.as_attribute(), Some((12.0, 1.5)));
    }
}
