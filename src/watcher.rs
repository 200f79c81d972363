//! File watching functionality using the notify crate.

use crate::config::TailConfig;
use crate::error::Result;
use crate::notification::Notification;
use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Anything that can observe one file and push [`Notification`]s for it.
///
/// A source only ever sends `Write` and `Error`; the initial read belongs to
/// the monitor.
pub trait WatchSource: Send + 'static {
    fn watch(
        &mut self,
        file_path: &Path,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Result<()>;
}

/// Watches the parent directory of a file through notify and forwards the
/// events that concern the file.
pub struct FileWatcher {
    config: TailConfig,
    backend: Option<Box<dyn Watcher + Send>>,
}

impl FileWatcher {
    pub fn new(config: TailConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    #[cfg(test)]
    pub fn is_watching(&self) -> bool {
        self.backend.is_some()
    }
}

impl WatchSource for FileWatcher {
    fn watch(
        &mut self,
        file_path: &Path,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Result<()> {
        let file_name = file_name_of(file_path);
        let handler = move |res: notify::Result<Event>| {
            if let Some(notification) = notification_for(res, &file_name) {
                debug!(?notification, "watch event");
                let _ = notifications.send(notification);
            }
        };

        let notify_config = self.config.notify_config();
        let mut backend: Box<dyn Watcher + Send> = match self.config.poll_interval {
            Some(_) => Box::new(PollWatcher::new(handler, notify_config)?),
            None => Box::new(RecommendedWatcher::new(handler, notify_config)?),
        };

        let watch_path = watch_dir(file_path);
        backend.watch(&watch_path, RecursiveMode::NonRecursive)?;
        info!(path = %watch_path.display(), polling = self.config.poll_interval.is_some(), "watch started");

        self.backend = Some(backend);
        Ok(())
    }
}

fn file_name_of(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn watch_dir(file_path: &Path) -> PathBuf {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => file_path.to_path_buf(),
    }
}

fn path_has_file_name(path: &Path, target_file_name: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy() == target_file_name)
        .unwrap_or(false)
}

/// Check if a notify event is relevant to a specific file
pub(crate) fn is_event_relevant_to_file(event: &Event, target_file_name: &str) -> bool {
    event
        .paths
        .iter()
        .any(|path| path_has_file_name(path, target_file_name))
}

/// Translate a raw notify result into a notification for `file_name`, if it
/// concerns that file.
pub(crate) fn notification_for(
    res: notify::Result<Event>,
    file_name: &str,
) -> Option<Notification> {
    match res {
        Ok(event) => {
            if !is_event_relevant_to_file(&event, file_name) {
                return None;
            }
            match event.kind {
                EventKind::Remove(_) => Some(Notification::Error {
                    file_name: file_name.to_string(),
                    reason: "file was removed".to_string(),
                }),
                // Our own reads show up as access events.
                EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
                    Some(Notification::Write {
                        file_name: file_name.to_string(),
                    })
                }
                EventKind::Access(_) => None,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
                    Some(Notification::Write {
                        file_name: file_name.to_string(),
                    })
                }
            }
        }
        Err(e) => {
            let unrelated = !e.paths.is_empty()
                && !e.paths.iter().any(|path| path_has_file_name(path, file_name));
            if unrelated {
                None
            } else {
                Some(Notification::Error {
                    file_name: file_name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
