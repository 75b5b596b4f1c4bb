use crate::types::Version;
use thiserror::Error;

/// A tree source failed structural validation.
///
/// `path` is a human-readable location of the offending node, e.g.
/// `root.choices[1].node.choices[0]`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failures of the catalog contract (`put`/`get`/`delete`/`list`).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no tree named '{name}'")]
    NotFound { name: String },

    #[error("version conflict on '{name}': requested v{requested}, current v{current}")]
    VersionConflict {
        name: String,
        requested: Version,
        current: Version,
    },

    /// Malformed or structurally invalid source. A failed `put` never
    /// touches the previously stored version.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("store lock poisoned: {0}")]
    Lock(String),

    /// Backend API answered with an error status (>= 400).
    #[error("backend returned {status} for {url}")]
    Backend { status: u16, url: String },

    /// Could not reach the backend API at all.
    #[error("transport: {0}")]
    Transport(String),
}

/// Failures of session navigation. The session is left unchanged
/// whenever one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `select` on a terminal node, or no choice with that label.
    #[error("no choice '{label}' at node '{node}'")]
    InvalidChoice { node: String, label: String },

    /// `rewind_to` target not present in the visited history.
    #[error("'{label}' is not in the session history")]
    InvalidHistoryTarget { label: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_path_first() {
        let err = ValidationError::new("root.choices[1].node", "duplicate label 'Right'");
        assert_eq!(
            err.to_string(),
            "root.choices[1].node: duplicate label 'Right'"
        );
    }

    #[test]
    fn catalog_error_wraps_validation() {
        let err: CatalogError = ValidationError::new("root", "missing label").into();
        assert!(matches!(err, CatalogError::Invalid(_)));
        assert_eq!(err.to_string(), "root: missing label");
    }
}
