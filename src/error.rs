//! Error types shared by all combinators
//!
//! Two families of failure exist:
//! - `UsageError`: malformed construction input, detected before any body runs
//! - `ResourceError`: an external resource could not be opened or read
//!
//! Short-circuiting and end-of-data are ordinary control outcomes and never
//! show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed input to a combinator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    #[error("range list is empty")]
    EmptyRangeList,

    #[error("range '{name}' has a zero step")]
    ZeroStep { name: String },

    #[error("range '{name}' has a non-finite bound or step")]
    NonFinite { name: String },

    #[error("name '{name}' is bound more than once")]
    DuplicateBinding { name: String },

    #[error("scan bounds [{start}, {end}) do not fit a sequence of length {len}")]
    BadBounds {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Failure to open or read an external resource
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read record {record} of {}: {source}", path.display())]
    Read {
        path: PathBuf,
        record: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode record {record} of {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        record: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure a combinator can report on its own
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type FlowResult<T> = Result<T, FlowError>;
