use std::path::PathBuf;

/// Convenience result type used across cutxml.
pub type CutResult<T> = Result<T, CutError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum CutError {
    /// Invalid clip requests, options or time strings. Raised before any probing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The metadata probe failed for a referenced path.
    ///
    /// `diagnostic` carries the probe's own output unmodified.
    #[error("metadata probe failed for '{}': {diagnostic}", .path.display())]
    Probe {
        /// Path handed to the probe.
        path: PathBuf,
        /// Raw diagnostic text reported by the probe.
        diagnostic: String,
    },

    /// A referenced file (the music bed) does not exist.
    #[error("reference not found: '{}'", .0.display())]
    ReferenceNotFound(PathBuf),

    /// Errors while serializing documents or (de)serializing JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutError {
    /// Build a [`CutError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`CutError::Probe`] value.
    pub fn probe(path: impl Into<PathBuf>, diagnostic: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Build a [`CutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
