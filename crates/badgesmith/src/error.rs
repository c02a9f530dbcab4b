use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read '{path}'")]
    ConfigMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}'")]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration")]
    InvalidConfig(#[from] badgesmith_markers::MarkerError),

    #[error("Failed to read document '{path}'")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document '{path}'")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed notebook '{path}': {message}")]
    Notebook { path: PathBuf, message: String },

    #[error("Unsupported document type '{0}' (expected .md or .ipynb)")]
    UnsupportedDocument(PathBuf),

    #[error("Rendering '{card}' failed: {message}")]
    Render { card: String, message: String },

    #[error("Rendering '{card}' timed out after {}s", .timeout.as_secs())]
    RenderTimeout { card: String, timeout: Duration },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error")]
    WalkDir(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// An error followed by its chain of sources, separated by ": ".
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
