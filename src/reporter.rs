//! Downstream sinks for reported text.

use crate::error::{Error, Result};
use futures::Stream;
use std::io::Write;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::debug;

/// Receives every piece of text a monitor emits: the initial contents, each
/// increment, and formatted `Tail error: ...` messages.
pub trait Reporter: Send + Sync + 'static {
    fn report(&self, text: &str);
}

/// Writes reports verbatim to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout has nowhere left to report to.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

/// Forwards reports into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelReporter {
    /// Creates a reporter together with the stream that receives its reports.
    pub fn new() -> (Self, ReportStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, ReportStream { receiver: rx })
    }

    /// Sends a report, failing if the receiving side has been dropped.
    pub fn try_report(&self, text: &str) -> Result<()> {
        self.tx
            .send(text.to_string())
            .map_err(|_| Error::MonitorClosed)
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, text: &str) {
        if self.try_report(text).is_err() {
            debug!("report dropped, receiver is gone");
        }
    }
}

/// Stream of texts sent through a [`ChannelReporter`].
pub struct ReportStream {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl ReportStream {
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }
}

impl Stream for ReportStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}
