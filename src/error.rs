//! Error types for the tail monitor.

use thiserror::Error;

/// The main error type for tail monitor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors when opening, seeking or reading the tailed file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the notify backend while setting up a watch.
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The path could not be resolved to something watchable.
    #[error("Invalid file path: {message}")]
    InvalidPath { message: String },

    /// The monitor task has already stopped.
    #[error("Monitor closed")]
    MonitorClosed,
}

/// A convenient Result type for tail monitor operations.
pub type Result<T> = std::result::Result<T, Error>;
