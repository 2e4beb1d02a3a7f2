use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("malformed value under {key}: expected {expected} bytes, found {found}")]
    MalformedValue {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
