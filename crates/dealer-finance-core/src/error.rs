use thiserror::Error;

/// Errors raised at the edges of the engine (parsing, configuration).
///
/// The calculation path itself never fails: out-of-range inputs are clamped
/// and degenerate arithmetic resolves to zero. See [`crate::inputs::Adjustment`].
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown finance product: {0}")]
    UnknownProduct(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinanceError {
    fn from(e: serde_json::Error) -> Self {
        FinanceError::SerializationError(e.to_string())
    }
}
