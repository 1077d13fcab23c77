//! Port traits for everything the editor session talks to.
//!
//! Forms go through [`skilleditor_domain::FieldView`]; the traits here cover
//! the rest: where saved files go, how documents are parsed, the icon
//! material catalogue and the selection lists.

use serde_json::Value;

use crate::error::EditorError;

/// Destination for saved entity files.
#[cfg_attr(test, mockall::automock)]
pub trait SaveSink {
    /// Stores `contents` under `file_name` (e.g. `Warrior.yml`).
    fn save(&self, file_name: &str, contents: &str) -> Result<(), EditorError>;
}

/// Turns document text into the value model entities load from.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentParser {
    /// Empty input parses to `Value::Null`.
    fn parse(&self, text: &str) -> Result<Value, EditorError>;
}

/// Source of icon material names.
#[cfg_attr(test, mockall::automock)]
pub trait MaterialCatalog {
    fn materials(&self) -> Vec<String>;
}

/// A selection list showing one entry per entity, in registry order.
#[cfg_attr(test, mockall::automock)]
pub trait EntityListView {
    fn push(&mut self, label: &str);

    fn set_label(&mut self, index: usize, label: &str);

    fn remove(&mut self, index: usize);

    fn select(&mut self, index: usize);

    /// Labels currently shown.
    fn labels(&self) -> Vec<String>;

    fn selected(&self) -> Option<usize>;
}
