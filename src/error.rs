//! Errors returned throughout the trajectory pipeline. Every operation fails
//! fast: there are no partial graphs or half-written trajectories.

use std::path::PathBuf;
use thiserror::Error;

/// The error type shared by every module in the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A scraped URL did not contain a coordinate pair.
    #[error("line {line}: no valid coordinates found in {input:?}")]
    Parse {
        /// One-based line number within the batch
        line: usize,
        /// The offending input line
        input: String,
    },

    /// A value was well-formed but violates a domain constraint, such as a
    /// latitude outside of [-90, 90].
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced pano id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller supplied an unusable argument (a zero stride, a rig whose
    /// labels do not match its camera count, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// There is not enough data to build a rendezvous.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Reading or writing a dataset file failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The file or directory being accessed
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// A JSON document could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an [std::io::Error] together with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Shorthand for results carrying an [Error].
pub type Result<T> = std::result::Result<T, Error>;
