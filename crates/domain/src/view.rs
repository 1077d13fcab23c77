//! Form rendering port
//!
//! Entities never talk to a concrete UI. They describe their form through
//! [`FieldView`] and read user edits back through the same trait, which
//! keeps the data model testable without any rendering harness.

use std::collections::HashMap;

/// Which block of the save format a field is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    /// Directly under the entity header
    #[default]
    Root,
    /// Inside the nested `attributes:` block
    Attributes,
}

/// Identifies one rendered control.
///
/// Keys are unique within a section only: a class has both a `mana` text
/// field and a `mana` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub section: Section,
    pub key: String,
}

impl ControlId {
    pub fn new(section: Section, key: impl Into<String>) -> Self {
        Self {
            section,
            key: key.into(),
        }
    }

    pub fn root(key: impl Into<String>) -> Self {
        Self::new(Section::Root, key)
    }

    pub fn attribute(key: impl Into<String>) -> Self {
        Self::new(Section::Attributes, key)
    }
}

/// The input control a field asks for, with its initial contents.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Single-line text box
    Text { value: String },
    /// Numeric text box (contents are still raw text)
    Number { value: String },
    /// Drop-down with one selected option
    Select {
        options: Vec<String>,
        selected: String,
    },
    /// One checkbox per option
    Flags {
        options: Vec<String>,
        checked: Vec<bool>,
    },
    /// Multi-line text area, one entry per line
    Lines { lines: Vec<String> },
    /// Base and per-level scale boxes
    Pair { base: String, scale: String },
}

impl ControlKind {
    /// The state a freshly rendered control reports before any edit.
    pub fn initial_state(&self) -> ControlState {
        match self {
            Self::Text { value } | Self::Number { value } => ControlState::Text(value.clone()),
            Self::Select { selected, .. } => ControlState::Text(selected.clone()),
            Self::Flags { checked, .. } => ControlState::Checks(checked.clone()),
            Self::Lines { lines } => ControlState::Text(lines.join("\n")),
            Self::Pair { base, scale } => ControlState::Pair {
                base: base.clone(),
                scale: scale.clone(),
            },
        }
    }
}

/// Everything needed to render one labelled control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSpec {
    pub id: ControlId,
    pub label: String,
    pub tooltip: Option<String>,
    pub kind: ControlKind,
}

/// What a control currently holds, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlState {
    /// Text box, number box, selected option, or text area contents
    Text(String),
    /// Checkbox states in option order
    Checks(Vec<bool>),
    /// Raw base and scale box contents
    Pair { base: String, scale: String },
}

/// Buttons at the edges of an entity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormAction {
    Save,
    Delete,
    Done,
}

/// Capability interface for a form container.
pub trait FieldView {
    /// Remove everything previously rendered.
    fn clear(&mut self);
    fn heading(&mut self, text: &str);
    fn separator(&mut self);
    /// Free-standing hint text between controls.
    fn note(&mut self, text: &str);
    /// Append a control.
    fn control(&mut self, spec: ControlSpec);
    fn action(&mut self, action: FormAction);
    /// Current state of a control, `None` when it was never rendered.
    fn read(&self, id: &ControlId) -> Option<ControlState>;
}

/// One rendered element of a [`FormBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormItem {
    Heading(String),
    Separator,
    Note(String),
    Control(ControlSpec),
    Action(FormAction),
}

/// In-memory [`FieldView`].
///
/// Records the rendered form in order and holds the live state of every
/// control, so callers can simulate edits with [`FormBuffer::edit`].
#[derive(Debug, Default)]
pub struct FormBuffer {
    items: Vec<FormItem>,
    states: HashMap<ControlId, ControlState>,
}

impl FormBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rendered controls in order.
    pub fn controls(&self) -> impl Iterator<Item = &ControlSpec> {
        self.items.iter().filter_map(|item| match item {
            FormItem::Control(spec) => Some(spec),
            _ => None,
        })
    }

    pub fn find_control(&self, id: &ControlId) -> Option<&ControlSpec> {
        self.controls().find(|spec| &spec.id == id)
    }

    /// Replaces a control's state. Returns `false` if no such control was
    /// rendered; the edit is dropped in that case.
    pub fn edit(&mut self, id: &ControlId, state: ControlState) -> bool {
        match self.states.get_mut(id) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Shorthand for editing a root-section text, number or select control.
    pub fn set_text(&mut self, key: &str, text: impl Into<String>) -> bool {
        self.edit(&ControlId::root(key), ControlState::Text(text.into()))
    }

    /// Shorthand for editing an attribute's base and scale boxes.
    pub fn set_pair(&mut self, key: &str, base: impl Into<String>, scale: impl Into<String>) -> bool {
        self.edit(
            &ControlId::attribute(key),
            ControlState::Pair {
                base: base.into(),
                scale: scale.into(),
            },
        )
    }
}

impl FieldView for FormBuffer {
    fn clear(&mut self) {
        self.items.clear();
        self.states.clear();
    }

    fn heading(&mut self, text: &str) {
        self.items.push(FormItem::Heading(text.to_string()));
    }

    fn separator(&mut self) {
        self.items.push(FormItem::Separator);
    }

    fn note(&mut self, text: &str) {
        self.items.push(FormItem::Note(text.to_string()));
    }

    fn control(&mut self, spec: ControlSpec) {
        self.states.insert(spec.id.clone(), spec.kind.initial_state());
        self.items.push(FormItem::Control(spec));
    }

    fn action(&mut self, action: FormAction) {
        self.items.push(FormItem::Action(action));
    }

    fn read(&self, id: &ControlId) -> Option<ControlState> {
        self.states.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_control(key: &str, value: &str) -> ControlSpec {
        ControlSpec {
            id: ControlId::root(key),
            label: key.to_string(),
            tooltip: None,
            kind: ControlKind::Text {
                value: value.to_string(),
            },
        }
    }

    #[test]
    fn rendered_control_reports_initial_state() {
        let mut form = FormBuffer::new();
        form.control(text_control("name", "Class 1"));

        assert_eq!(
            form.read(&ControlId::root("name")),
            Some(ControlState::Text("Class 1".to_string()))
        );
        assert_eq!(form.read(&ControlId::attribute("name")), None);
    }

    #[test]
    fn edits_to_missing_controls_are_dropped() {
        let mut form = FormBuffer::new();
        assert!(!form.set_text("name", "Mage"));
        assert!(form.read(&ControlId::root("name")).is_none());
    }

    #[test]
    fn clear_discards_items_and_state() {
        let mut form = FormBuffer::new();
        form.heading("Class Details");
        form.control(text_control("name", "Class 1"));
        assert!(form.set_text("name", "Mage"));

        form.clear();
        assert!(form.is_empty());
        assert!(form.read(&ControlId::root("name")).is_none());
    }

    #[test]
    fn lines_start_as_joined_text() {
        let kind = ControlKind::Lines {
            lines: vec!["a".to_string(), String::new(), "b".to_string()],
        };
        assert_eq!(kind.initial_state(), ControlState::Text("a\n\nb".to_string()));
    }
}
