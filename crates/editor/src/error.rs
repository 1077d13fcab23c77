//! Error types for the editor layer.

use std::path::{Path, PathBuf};

use skilleditor_domain::DomainError;

/// Editor operation errors.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A document could not be parsed.
    #[error("Failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Reading or writing a file failed - includes the path for actionable messages.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A save target could not accept the file.
    #[error("Cannot save {file_name}: {message}")]
    Save { file_name: String, message: String },
}

impl EditorError {
    /// Create a Parse error naming what was being parsed.
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Create an Io error with the path that failed.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a Save error.
    pub fn save(file_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Save {
            file_name: file_name.into(),
            message: message.to_string(),
        }
    }

    /// Check if a domain rule rejected a name.
    pub fn is_name_taken(&self) -> bool {
        matches!(self, Self::Domain(err) if err.is_name_taken())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = EditorError::io(
            "/tmp/skills/Fireball.yml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error on /tmp/skills/Fireball.yml: denied");
    }

    #[test]
    fn domain_errors_pass_through() {
        let err: EditorError = DomainError::name_taken("Class", "Warrior").into();
        assert!(err.is_name_taken());
        assert_eq!(err.to_string(), "Class name already taken: Warrior");
    }
}
