//! Messages delivered to a [`TailMonitor`](crate::TailMonitor).

/// A single notification about the tailed file.
///
/// `Write` and `Error` come from a watch source. `InitialRead` is produced by
/// the monitor itself when it starts and carries the text already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The file was written to.
    Write { file_name: String },
    /// The watch backend could not observe the file.
    Error { file_name: String, reason: String },
    /// The whole file as it was when the monitor started.
    InitialRead { file_name: String, text: String },
}

impl Notification {
    pub fn file_name(&self) -> &str {
        match self {
            Notification::Write { file_name }
            | Notification::Error { file_name, .. }
            | Notification::InitialRead { file_name, .. } => file_name,
        }
    }
}
