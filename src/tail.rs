//! Background tailing: a watch source feeding a monitor on its own task.

use crate::config::TailConfig;
use crate::error::Result;
use crate::monitor::TailMonitor;
use crate::notification::Notification;
use crate::reporter::{ChannelReporter, ReportStream, Reporter};
use crate::watcher::{FileWatcher, WatchSource};
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Owns a running tail. Dropping it stops the watch.
pub struct TailHandle {
    _shutdown_tx: broadcast::Sender<()>,
    task_handle: Option<JoinHandle<()>>,
}

impl TailHandle {
    /// Starts tailing `path` with the notify-backed [`FileWatcher`].
    pub async fn spawn<R, P>(reporter: R, path: P, config: TailConfig) -> Result<Self>
    where
        R: Reporter,
        P: AsRef<Path>,
    {
        Self::spawn_with_source(reporter, path, FileWatcher::new(config)).await
    }

    /// Starts tailing `path` with any watch source.
    ///
    /// The watch is registered before the initial read, so a write racing with
    /// startup is reported at least once. The initial contents are reported
    /// before this returns; a failure to read them is returned as an error.
    pub async fn spawn_with_source<R, P, W>(reporter: R, path: P, mut source: W) -> Result<Self>
    where
        R: Reporter,
        P: AsRef<Path>,
        W: WatchSource,
    {
        let mut monitor = TailMonitor::new(reporter, path)?;

        let (tx, rx) = mpsc::unbounded_channel();
        source.watch(monitor.file_path(), tx)?;

        let initial = monitor.initial_read().await?;
        monitor.handle(initial).await?;
        info!(
            path = %monitor.file_path().display(),
            cursor = monitor.previous_length(),
            "tail started"
        );

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task_handle = tokio::spawn(async move {
            monitor_task(monitor, source, rx, shutdown_rx).await;
        });

        Ok(Self {
            _shutdown_tx: shutdown_tx,
            task_handle: Some(task_handle),
        })
    }

    /// Whether the background task has stopped, e.g. because its watch
    /// source went away.
    pub fn is_finished(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Stops the watch and waits for the background task to exit.
    pub async fn shutdown(mut self) {
        let _ = self._shutdown_tx.send(());
        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "tail task did not exit cleanly");
            }
        }
    }
}

impl Drop for TailHandle {
    fn drop(&mut self) {
        // Ignore errors if the task is already gone
        let _ = self._shutdown_tx.send(());
    }
}

/// Feeds notifications to the monitor one at a time until shutdown or until
/// the source closes its channel.
///
/// A read failure is reported like a watch error and the loop carries on, so a
/// file that disappears and comes back keeps being tailed.
async fn monitor_task<R: Reporter, W: WatchSource>(
    mut monitor: TailMonitor<R>,
    _source: W,
    mut notifications: mpsc::UnboundedReceiver<Notification>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                break;
            }

            notification = notifications.recv() => {
                match notification {
                    Some(notification) => {
                        if let Err(e) = monitor.handle(notification).await {
                            warn!(path = %monitor.file_path().display(), error = %e, "read failed");
                            monitor.on_error(&e.to_string());
                        }
                    }
                    None => break,
                }
            }
        }
    }

    info!(path = %monitor.file_path().display(), "tail stopped");
}

/// A stream of everything reported for one tailed file.
pub struct TailStream {
    reports: ReportStream,
    _handle: TailHandle,
}

impl TailStream {
    pub async fn new<P: AsRef<Path>>(path: P, config: TailConfig) -> Result<Self> {
        let (reporter, reports) = ChannelReporter::new();
        let handle = TailHandle::spawn(reporter, path, config).await?;

        Ok(Self {
            reports,
            _handle: handle,
        })
    }
}

impl Stream for TailStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.reports).poll_next(cx)
    }
}
