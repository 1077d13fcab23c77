//! Editor configuration read from the environment.

use std::path::{Path, PathBuf};

use skilleditor_domain::AttributeNames;

pub const DATA_DIR_VAR: &str = "SKILLEDITOR_DATA_DIR";
pub const OUTPUT_DIR_VAR: &str = "SKILLEDITOR_OUTPUT_DIR";
pub const ATTRIBUTES_FILE_VAR: &str = "SKILLEDITOR_ATTRIBUTES_FILE";
pub const ATTRIBUTES_VAR: &str = "SKILLEDITOR_ATTRIBUTES";

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Directory holding `classes/` and `skills/` to load
    pub data_dir: PathBuf,
    /// Directory saved files are written under
    pub output_dir: PathBuf,
    /// Attribute definitions file; its top-level keys replace `attributes`
    pub attributes_file: PathBuf,
    /// Attribute names used until a definitions file is imported
    pub attributes: AttributeNames,
}

impl EditorConfig {
    /// Reads the process environment. Call `dotenvy` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = var(DATA_DIR_VAR).map_or_else(|| PathBuf::from("./data"), PathBuf::from);
        let output_dir = var(OUTPUT_DIR_VAR).map_or_else(|| PathBuf::from("./out"), PathBuf::from);
        let attributes_file = var(ATTRIBUTES_FILE_VAR)
            .map_or_else(|| data_dir.join("attributes.yml"), PathBuf::from);
        let attributes = var(ATTRIBUTES_VAR)
            .map_or_else(AttributeNames::standard, |list| AttributeNames::new(list.split(',')));

        Self {
            data_dir,
            output_dir,
            attributes_file,
            attributes,
        }
    }

    pub fn classes_dir(&self) -> PathBuf {
        self.data_dir.join("classes")
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.data_dir.join("skills")
    }

    pub fn class_output_dir(&self) -> PathBuf {
        self.output_dir.join("classes")
    }

    pub fn skill_output_dir(&self) -> PathBuf {
        self.output_dir.join("skills")
    }

    pub fn attributes_file(&self) -> &Path {
        &self.attributes_file
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
