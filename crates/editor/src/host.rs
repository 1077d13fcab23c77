//! Headless host: loads a plugin data directory and writes every entity
//! back out in the editor's save format.

use std::fs;
use std::path::{Path, PathBuf};

use skilleditor_domain::FormBuffer;

use crate::adapters::{BuiltinMaterials, FileSink, ListBuffer, YamlParser};
use crate::config::EditorConfig;
use crate::editor::{Editor, EditorPorts, LoadReport};
use crate::error::EditorError;
use crate::ports::SaveSink;

/// What a host run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSummary {
    pub classes: LoadReport,
    pub skills: LoadReport,
    /// Number of files written
    pub written: usize,
}

/// Builds a session wired to in-memory forms and lists.
pub fn headless_editor(config: &EditorConfig) -> Editor<FormBuffer> {
    Editor::new(
        EditorPorts {
            sink: Box::new(FileSink::new(config.output_dir.clone())),
            parser: Box::new(YamlParser),
            materials: Box::new(BuiltinMaterials),
            class_form: FormBuffer::new(),
            skill_form: FormBuffer::new(),
            class_list: Box::new(ListBuffer::new()),
            skill_list: Box::new(ListBuffer::new()),
        },
        config.attributes.clone(),
    )
}

pub fn run(config: &EditorConfig) -> Result<HostSummary, EditorError> {
    let mut editor = headless_editor(config);

    let attributes_file = config.attributes_file();
    if attributes_file.is_file() {
        let text = read(attributes_file)?;
        editor.import_attributes(&text)?;
    } else {
        tracing::info!(
            path = %attributes_file.display(),
            "No attribute definitions file, using configured attributes"
        );
    }

    let mut summary = HostSummary::default();
    for path in document_files(&config.classes_dir())? {
        let text = read(&path)?;
        summary.classes.merge(editor.load_classes(&text)?);
    }
    for path in document_files(&config.skills_dir())? {
        let text = read(&path)?;
        summary.skills.merge(editor.load_skills(&text)?);
    }

    // Only entities that came from a file; placeholders and legacy skills
    // are not written.
    summary.written += write_loaded(
        &FileSink::new(config.class_output_dir()),
        editor.export_classes(),
        &summary.classes.loaded,
    )?;
    summary.written += write_loaded(
        &FileSink::new(config.skill_output_dir()),
        editor.export_skills(),
        &summary.skills.loaded,
    )?;

    tracing::info!(
        classes = summary.classes.loaded.len(),
        skills = summary.skills.loaded.len(),
        legacy = summary.skills.legacy.len(),
        written = summary.written,
        "Host run complete"
    );
    Ok(summary)
}

fn read(path: &Path) -> Result<String, EditorError> {
    fs::read_to_string(path).map_err(|e| EditorError::io(path, e))
}

/// `*.yml` and `*.yaml` files directly in `dir`, sorted by name. A missing
/// directory has none.
fn document_files(dir: &Path) -> Result<Vec<PathBuf>, EditorError> {
    if !dir.is_dir() {
        tracing::debug!(path = %dir.display(), "Directory not found, nothing to load");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| EditorError::io(dir, e))? {
        let path = entry.map_err(|e| EditorError::io(dir, e))?.path();
        let is_document = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        if path.is_file() && is_document {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn write_loaded(
    sink: &dyn SaveSink,
    exported: Vec<(String, String)>,
    loaded: &[String],
) -> Result<usize, EditorError> {
    let mut written = 0;
    for (file_name, contents) in exported {
        let name = file_name.strip_suffix(".yml").unwrap_or(&file_name);
        if loaded.iter().any(|l| l == name) {
            sink.save(&file_name, &contents)?;
            written += 1;
        }
    }
    Ok(written)
}
