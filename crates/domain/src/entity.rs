//! Behaviour shared by classes and skills

use crate::attributes::AttributeNames;
use crate::field::Field;
use crate::save_format::{Mapping, INDENT};
use crate::view::{FieldView, Section};

/// What an entity needs from its surroundings to render a form.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    /// Globally configured attribute names
    pub attributes: &'a AttributeNames,
    /// Resolved material catalogue for icon pickers
    pub materials: &'a [String],
    /// Names of every other entity of the same kind, in list order
    pub siblings: &'a [String],
}

/// Result of loading an entity from a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fields were populated from the document
    Loaded,
    /// The document uses a legacy layout and needs conversion; no field
    /// was touched
    Legacy { markers: Vec<&'static str> },
}

/// A named, user-editable configuration object.
///
/// Field 0 is always the `name` text field.
pub trait Entity {
    /// Display name of the kind, also used for placeholder names
    const KIND: &'static str;

    fn new(name: &str, attributes: &AttributeNames) -> Self
    where
        Self: Sized;

    fn fields(&self) -> &[Field];

    fn fields_mut(&mut self) -> &mut [Field];

    /// Clears the view and renders the whole form.
    fn build_form(&mut self, view: &mut dyn FieldView, ctx: &FormContext<'_>);

    /// The entity's block of the save format.
    fn save_string(&self) -> String;

    /// Populates fields from the mapping under the entity's header.
    fn load(&mut self, data: &Mapping) -> LoadOutcome;

    fn name(&self) -> &str {
        self.fields().first().and_then(Field::as_text).unwrap_or_default()
    }

    fn set_name(&mut self, name: &str) {
        if let Some(field) = self.fields_mut().first_mut() {
            field.set_text(name);
        }
    }

    /// Reads every field back from its control.
    fn read_form(&mut self, view: &dyn FieldView) {
        for field in self.fields_mut() {
            field.read_from(view);
        }
    }

    fn field(&self, section: Section, key: &str) -> Option<&Field> {
        self.fields()
            .iter()
            .find(|f| f.section() == section && f.key() == key)
    }

    fn field_mut(&mut self, section: Section, key: &str) -> Option<&mut Field> {
        self.fields_mut()
            .iter_mut()
            .find(|f| f.section() == section && f.key() == key)
    }
}

/// Writes the header, the root fields, then the `attributes:` block.
pub(crate) fn save_fields(name: &str, fields: &[Field]) -> String {
    let attribute_indent = format!("{INDENT}{INDENT}");
    let mut out = format!("{name}:\n");
    for field in fields.iter().filter(|f| f.section() == Section::Root) {
        out.push_str(&field.save_string(INDENT));
    }
    out.push_str(&format!("{INDENT}attributes:\n"));
    for field in fields.iter().filter(|f| f.section() == Section::Attributes) {
        out.push_str(&field.save_string(&attribute_indent));
    }
    out
}

/// Loads every field except the name, which always comes from the header.
///
/// Unknown keys are ignored and missing keys keep their current value.
pub(crate) fn load_fields(fields: &mut [Field], data: &Mapping) {
    let attributes = data.get("attributes").and_then(|a| a.as_object());
    for field in fields.iter_mut().skip(1) {
        let block = match field.section() {
            Section::Root => Some(data),
            Section::Attributes => attributes,
        };
        let Some(block) = block else {
            continue;
        };
        if let Some(parsed) = block.get(field.key()) {
            if !field.load(parsed) {
                tracing::debug!(key = field.key(), "Keeping default for field with unexpected shape");
            }
        } else if field.is_attribute() {
            let base = block.get(&format!("{}-base", field.key()));
            let scale = block.get(&format!("{}-scale", field.key()));
            field.load_compact(base, scale);
        }
    }
}
