use std::io;
use thiserror::Error;

use crate::models::ModelError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("malformed storage document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed key '{0}', expected <Kind>.<id>")]
    MalformedKey(String),

    #[error("record under key '{key}' carries id '{id}'")]
    KeyMismatch { key: String, id: String },

    #[error("unknown kind '{kind}' for key '{key}'")]
    UnknownKind { kind: String, key: String },

    #[error("invalid record '{key}': {source}")]
    Record { key: String, source: ModelError },
}

pub type StorageResult<T> = Result<T, StorageError>;
