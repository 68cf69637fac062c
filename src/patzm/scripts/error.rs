use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases of the scripts: local file
/// handling, the remote gist store, configuration and process checks.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport level failures of the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gist API answered with a non-success status.
    #[error("gist API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// An explicitly requested gist is not accessible with the credentials.
    #[error("gist with ID {0} not found")]
    GistNotFound(String),

    /// A new gist cannot be created from an empty local file.
    #[error("can't create a gist from the empty file {0}")]
    EmptySource(PathBuf),

    /// The path has no usable base name to key the remote file by.
    #[error("path has no UTF-8 file name: {0}")]
    InvalidFileName(PathBuf),

    /// A process owning the dictionary files is running.
    #[error("found {count} running Firefox processes")]
    ProcessConflict { count: usize },

    /// Raised after a batch sync in which at least one profile failed.
    #[error("{failed} of {total} profiles failed to sync")]
    BatchFailed { failed: usize, total: usize },

    /// No API token was given and none could be resolved from the config.
    #[error("no gist API token configured")]
    MissingCredentials,

    /// Raised when the configuration file is not valid TOML.
    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The home directory of the current user is unknown.
    #[error("cannot determine the home directory")]
    MissingHomeDirectory,

    /// Raised when a strftime pattern contains invalid specifiers.
    #[error("invalid datetime format '{0}'")]
    InvalidDateFormat(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
