use thiserror::Error;

/// Unified result type for the rackview crate.
pub type Result<T> = std::result::Result<T, RackError>;

/// Errors surfaced by the elevation engine.
#[derive(Debug, Error)]
pub enum RackError {
    #[error("invalid rack identifier `{0}`")]
    InvalidRackId(String),
    #[error("invalid display color `{0}`")]
    InvalidColor(String),
    #[error("asset list encoding failure: {0}")]
    AssetEncoding(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
