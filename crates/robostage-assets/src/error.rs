//! Errors raised while resolving link geometry.

use std::path::PathBuf;

/// A referenced asset could not be resolved.
///
/// Recoverable: importers substitute a placeholder for the affected visual
/// and collect the error for an end-of-import report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// No file exists for the mesh reference.
    #[error("mesh not found: {uri} (searched {searched:?})")]
    NotFound { uri: String, searched: Vec<PathBuf> },

    /// The file exists but could not be decoded.
    #[error("failed to load mesh {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// No importer handles this file type.
    #[error("unsupported mesh format {extension:?} for {path}")]
    Unsupported { path: PathBuf, extension: String },

    /// Primitive parameters are not positive and finite.
    #[error("invalid {kind} parameters: {message}")]
    InvalidPrimitive { kind: &'static str, message: String },

    /// Mesh loading is disabled for this session.
    #[error("mesh loading disabled, skipped {0}")]
    Skipped(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
