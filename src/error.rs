//! Error types for the documentation pipeline.
//!
//! Every variant here is recoverable at the granularity of one input file,
//! one module or one comment: the pipeline logs it and moves on.

use std::path::PathBuf;
use thiserror::Error;

use crate::comment::CommentError;

pub type Result<T> = std::result::Result<T, DocError>;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-end output in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The module has no `module` declaration, so it has no name to file it under.
    #[error("{file} has no module declaration")]
    NoModuleName { file: String },

    #[error("module {module} matches exclusion {pattern}")]
    Excluded { module: String, pattern: String },

    #[error("bad doc comment: {0}")]
    Comment(#[from] CommentError),
}
