use thiserror::Error;

/// Locally recoverable input rejections.
///
/// These are reported to the transport as structured outcomes; the session
/// state is left unchanged so the user can simply try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title too long: {len} characters (max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("invalid url: '{0}'")]
    InvalidUrl(String),

    #[error("unknown category: '{0}'")]
    UnknownCategory(String),
}

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by engine operations.
///
/// A persistence failure means the mutation was not committed to disk; the
/// in-memory document is not rolled back, so the caller must treat the
/// operation as failed and may retry it wholesale.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("caller is not on the admin allowlist")]
    Unauthorized,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
