//! Output sinks: where streamed assistant text and authorization notices go.
//!
//! The turn processor writes each text chunk as soon as it arrives. Sinks are
//! append-only and never fail; a sink whose consumer went away drops the text.

mod formatter;

use std::io::Write;
use std::sync::Mutex;

use tokio::sync::mpsc;

pub use formatter::ChatFormatter;

/// Append-only text channel to the user.
pub trait OutputSink: Send + Sync {
    fn write(&self, text: &str);
}

/// Prints to stdout and flushes after every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Captures every write in memory.
///
/// **Interaction**: Used in tests to assert what the processor emitted, write by write.
#[derive(Debug, Default)]
pub struct BufferSink {
    writes: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text written so far, concatenated.
    pub fn contents(&self) -> String {
        self.writes.lock().map(|w| w.concat()).unwrap_or_default()
    }

    /// Individual writes in arrival order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl OutputSink for BufferSink {
    fn write(&self, text: &str) {
        if let Ok(mut w) = self.writes.lock() {
            w.push(text.to_string());
        }
    }
}

/// Forwards every write over an unbounded channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutputSink for ChannelSink {
    fn write(&self, text: &str) {
        // Receiver may have been dropped.
        let _ = self.tx.send(text.to_string());
    }
}
