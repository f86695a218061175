use crate::DocId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The index reader failed; the whole query is abandoned.
    #[error("index reader failure: {0:#}")]
    Index(#[from] anyhow::Error),

    #[error("document {doc_id} has zero length")]
    ZeroLengthDocument { doc_id: DocId },

    #[error("collection has zero total length")]
    EmptyCollection,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
