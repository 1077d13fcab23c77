//! Save sink writing files into a directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EditorError;
use crate::ports::SaveSink;

/// Writes each saved file into `dir`, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for FileSink {
    fn save(&self, file_name: &str, contents: &str) -> Result<(), EditorError> {
        // Entity names are free text; keep the file inside `dir`.
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(EditorError::save(file_name, "not a plain file name"));
        }
        fs::create_dir_all(&self.dir).map_err(|e| EditorError::io(&self.dir, e))?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).map_err(|e| EditorError::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(())
    }
}
