//! Tail a single file: watch it for writes and report each newly appended
//! piece of text.
//!
//! A [`TailMonitor`] keeps a byte cursor into the file. It reads the whole
//! file once when started, then on every write notification reopens the file,
//! reads what lies past the cursor and hands it to a [`Reporter`].
//!
//! # Example
//!
//! ```rust,no_run
//! use tail_monitor::{TailConfig, watch_tail};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = watch_tail("app.log", TailConfig::default()).await?;
//!
//!     while let Some(text) = stream.next().await {
//!         print!("{}", text);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod monitor;
mod notification;
mod reader;
mod reporter;
mod tail;
mod watcher;

#[cfg(test)]
mod test_helpers;

pub use config::TailConfig;
pub use error::{Error, Result};
pub use monitor::TailMonitor;
pub use notification::Notification;
pub use reporter::{ChannelReporter, ConsoleReporter, ReportStream, Reporter};
pub use tail::{TailHandle, TailStream};
pub use watcher::{FileWatcher, WatchSource};

use std::path::Path;

/// Starts tailing `path`, sending everything to `reporter`.
///
/// The initial contents of the file have been reported by the time this
/// returns. The tail runs until the returned handle is dropped.
///
/// ```rust,no_run
/// use tail_monitor::{ConsoleReporter, TailConfig, spawn_tail};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let tail = spawn_tail(ConsoleReporter, "app.log", TailConfig::default()).await?;
///     tokio::signal::ctrl_c().await?;
///     tail.shutdown().await;
///     Ok(())
/// }
/// ```
pub async fn spawn_tail<R: Reporter, P: AsRef<Path>>(
    reporter: R,
    path: P,
    config: TailConfig,
) -> Result<TailHandle> {
    TailHandle::spawn(reporter, path, config).await
}

/// Creates a stream of everything reported for `path`.
pub async fn watch_tail<P: AsRef<Path>>(path: P, config: TailConfig) -> Result<TailStream> {
    TailStream::new(path, config).await
}
