//! The stateful core: one cursor, three kinds of notification.

use crate::error::{Error, Result};
use crate::notification::Notification;
use crate::reader::read_increment;
use crate::reporter::Reporter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tracks how much of one file has been read and reports whatever is new.
///
/// The monitor does no watching or scheduling of its own. Notifications are
/// fed to [`handle`](Self::handle) one at a time by whoever drives it, and the
/// file is reopened for every read so a writer always has access to it.
pub struct TailMonitor<R: Reporter> {
    file_path: PathBuf,
    file_name: String,
    previous_length: u64,
    reporter: R,
}

impl<R: Reporter> TailMonitor<R> {
    /// Creates a monitor for `path`, resolved against the current directory.
    ///
    /// The file does not need to exist yet; only the path is checked.
    pub fn new<P: AsRef<Path>>(reporter: R, path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidPath {
                message: "path is empty".to_string(),
            });
        }

        let file_path = std::path::absolute(path)?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| Error::InvalidPath {
                message: format!("{} does not name a file", file_path.display()),
            })?;

        Ok(Self {
            file_path,
            file_name,
            previous_length: 0,
            reporter,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Byte offset of the end of everything read so far.
    pub fn previous_length(&self) -> u64 {
        self.previous_length
    }

    /// Reads the text appended since the last read. Empty if nothing changed.
    pub async fn read_increment(&mut self) -> Result<String> {
        read_increment(&self.file_path, &mut self.previous_length).await
    }

    /// Reads the file from the current cursor (the start, on a fresh monitor)
    /// and wraps the text as an [`Notification::InitialRead`].
    pub async fn initial_read(&mut self) -> Result<Notification> {
        let text = self.read_increment().await?;
        Ok(Notification::InitialRead {
            file_name: self.file_name.clone(),
            text,
        })
    }

    /// Processes a single notification.
    ///
    /// Read failures are returned to the caller; watch errors carried by the
    /// notification are reported and are not an `Err` here.
    pub async fn handle(&mut self, notification: Notification) -> Result<()> {
        debug!(?notification, cursor = self.previous_length, "handling notification");
        match notification {
            Notification::Write { .. } => self.on_write().await,
            Notification::Error { reason, .. } => {
                self.on_error(&reason);
                Ok(())
            }
            Notification::InitialRead { text, .. } => {
                self.reporter.report(&text);
                Ok(())
            }
        }
    }

    /// Reports `reason` the same way a watch error is reported.
    pub fn on_error(&self, reason: &str) {
        self.reporter.report(&format!("Tail error: {}", reason));
    }

    async fn on_write(&mut self) -> Result<()> {
        let text = self.read_increment().await?;
        if !text.is_empty() {
            self.reporter.report(&text);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn reporter(&self) -> &R {
        &self.reporter
    }
}
