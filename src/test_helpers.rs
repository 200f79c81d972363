//! Test utilities for creating temporary log files and collecting reports.

#[cfg(test)]
use crate::notification::Notification;
#[cfg(test)]
use crate::reporter::Reporter;
#[cfg(test)]
use crate::watcher::WatchSource;
#[cfg(test)]
use std::fs::{File, OpenOptions};
#[cfg(test)]
use std::io::Write;
#[cfg(test)]
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
pub struct TempLogFile {
    pub path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

#[cfg(test)]
impl TempLogFile {
    /// Create a new, empty temporary log file
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file holding exactly `content`
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append(content)?;
        Ok(temp_file)
    }

    /// Append `content` verbatim, without adding a newline
    pub fn append(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;

        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file to zero length (simulate log rotation)
    pub fn truncate(&self) -> std::io::Result<()> {
        File::create(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reporter that keeps every report in memory.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&self, text: &str) {
        self.reports.lock().unwrap().push(text.to_string());
    }
}

/// Watch source driven by hand from a test.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct ManualSource {
    state: Arc<Mutex<ManualSourceState>>,
}

#[cfg(test)]
#[derive(Default)]
struct ManualSourceState {
    path: Option<PathBuf>,
    tx: Option<tokio::sync::mpsc::UnboundedSender<Notification>>,
}

#[cfg(test)]
impl ManualSource {
    pub fn watched_path(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().path.clone()
    }

    pub fn send_write(&self) {
        self.send(|file_name| Notification::Write { file_name });
    }

    pub fn send_error(&self, reason: &str) {
        self.send(|file_name| Notification::Error {
            file_name,
            reason: reason.to_string(),
        });
    }

    /// Drop the sender, as a watcher going away would.
    pub fn close(&self) {
        self.state.lock().unwrap().tx = None;
    }

    fn send(&self, make: impl FnOnce(String) -> Notification) {
        let state = self.state.lock().unwrap();
        let file_name = state
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(tx) = &state.tx {
            tx.send(make(file_name)).unwrap();
        }
    }
}

#[cfg(test)]
impl WatchSource for ManualSource {
    fn watch(
        &mut self,
        file_path: &Path,
        notifications: tokio::sync::mpsc::UnboundedSender<Notification>,
    ) -> crate::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.path = Some(file_path.to_path_buf());
        state.tx = Some(notifications);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_append_is_verbatim() {
        let temp_file = TempLogFile::with_content("a").unwrap();
        temp_file.append("b\n").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "ab\n");
    }

    #[test]
    fn test_truncate() {
        let temp_file = TempLogFile::with_content("initial content").unwrap();
        temp_file.truncate().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_recording_reporter_shares_state_between_clones() {
        let reporter = RecordingReporter::default();
        let clone = reporter.clone();

        clone.report("one");
        reporter.report("two");

        assert_eq!(reporter.reports(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_manual_source_sends_for_watched_file() {
        let mut source = ManualSource::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        source.watch(Path::new("/tmp/app.log"), tx).unwrap();

        source.send_write();
        source.close();

        assert_eq!(
            rx.recv().await,
            Some(Notification::Write {
                file_name: "app.log".to_string()
            })
        );
        assert_eq!(rx.recv().await, None);
    }
}
