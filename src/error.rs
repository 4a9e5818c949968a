//! Error types for loading sample texts.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read samples from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no samples available in {0}")]
    Empty(String),

    #[error("unknown builtin sample set: {0}")]
    UnknownSet(String),

    #[error("failed to decode sample set: {0}")]
    Json(#[from] serde_json::Error),
}
