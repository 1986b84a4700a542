use thiserror::Error;

/// Errors raised by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    NoSuchTable(String),

    #[error("Record not found: {0}")]
    NoSuchRecord(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ListError {
    /// Malformed or tampered cursor token. The facade recovers from this by
    /// starting from the first page; it never reaches callers of `list`.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Scan failed: {0}")]
    ScanFailed(#[from] StoreError),

    #[error("Scan budget exceeded after {calls} scan calls")]
    ScanBudgetExceeded { calls: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
