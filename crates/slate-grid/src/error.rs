//! Error types for the grid engine.

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the grid engine.
///
/// Data-shape problems (non-sequence row input, missing nested paths,
/// throwing render functions) are deliberately NOT errors: they are recovered
/// in place by the normalizer, the path resolver, and the cell boundary.
/// This enum covers configuration misuse and export materialization only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two column descriptors share the same key.
    #[error("duplicate column key '{key}'")]
    DuplicateColumn { key: String },

    /// An operation referenced a column key no descriptor declares.
    #[error("no column with key '{key}'")]
    UnknownColumn { key: String },

    /// CSV materialization failed.
    #[error("CSV materialization failed: {0}")]
    Export(#[from] csv::Error),
}

impl Error {
    /// Create a duplicate-column error.
    pub fn duplicate_column(key: impl Into<String>) -> Self {
        Self::DuplicateColumn { key: key.into() }
    }

    /// Create an unknown-column error.
    pub fn unknown_column(key: impl Into<String>) -> Self {
        Self::UnknownColumn { key: key.into() }
    }
}
