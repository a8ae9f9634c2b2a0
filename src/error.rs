//! Error types for rendering, validation and the document stores.

use thiserror::Error;

/// Failure of the drawing surface or of PDF serialisation.
///
/// A failed render produces no output; nothing is retried.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Drawing surface error: {0}")]
    Surface(String),

    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),
}

/// Rejected document or row input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} of row {row} must not be negative (got {value})")]
    NegativeAmount {
        row: String,
        field: &'static str,
        value: f64,
    },

    #[error("{field} of row {row} must be a finite number")]
    NonFiniteAmount { row: String, field: &'static str },
}

/// Failure of a [`DocumentStore`](crate::store::DocumentStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Top-level error used by the command line front end.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
