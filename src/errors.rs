use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the pest guard library.
///
/// Undecodable or missing leaf images are not errors: they are reported
/// inside [`InferenceReport`](crate::InferenceReport). The variants here cover
/// host-level failures such as a broken lookup-table file or a bad input path.
#[derive(Error, Debug)]
pub enum PestGuardError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Lookup table error: could not parse {path:?}")]
    LookupTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PestGuardError>;
