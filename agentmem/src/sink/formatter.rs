//! Newline normalization for chat front-ends that render the accumulated text.

use std::sync::Mutex;

use super::OutputSink;

const AUTH_NOTICE: &str = "🔐 Authorization required";
const URL_INSTRUCTION: &str = "Visit the following URL to authorize:";
const WAITING_LINE: &str = "Waiting for authorization...";
const EMAIL_LISTING: &str = "You have the following emails";
const EMAIL_FROM: &str = "From ";

/// Wraps a sink and keeps authorization notices and email listings on their own lines.
///
/// Before an authorization notice, URL instruction, waiting line or email
/// listing a newline is inserted unless the text so far already ends with one.
/// After the notice a missing trailing newline is added, after the URL
/// instruction one newline, after the waiting line two. Everything else passes
/// through unchanged.
pub struct ChatFormatter<S> {
    inner: S,
    content: Mutex<String>,
}

impl<S: OutputSink> ChatFormatter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            content: Mutex::new(String::new()),
        }
    }

    /// Everything forwarded so far.
    pub fn content(&self) -> String {
        self.content.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn format_piece(so_far: &str, text: &str) -> String {
    let mut piece = String::new();
    let needs_break = !so_far.ends_with('\n');
    if text.contains(AUTH_NOTICE) {
        if needs_break {
            piece.push('\n');
        }
        piece.push_str(text);
        if !text.ends_with('\n') {
            piece.push('\n');
        }
    } else if text.contains(URL_INSTRUCTION) {
        if needs_break {
            piece.push('\n');
        }
        piece.push_str(text);
        piece.push('\n');
    } else if text.contains(WAITING_LINE) {
        if needs_break {
            piece.push('\n');
        }
        piece.push_str(text);
        piece.push_str("\n\n");
    } else if text.starts_with(EMAIL_LISTING) || text.starts_with(EMAIL_FROM) {
        if needs_break {
            piece.push('\n');
        }
        piece.push_str(text);
    } else {
        piece.push_str(text);
    }
    piece
}

impl<S: OutputSink> OutputSink for ChatFormatter<S> {
    fn write(&self, text: &str) {
        let Ok(mut content) = self.content.lock() else {
            self.inner.write(text);
            return;
        };
        let piece = format_piece(&content, text);
        content.push_str(&piece);
        drop(content);
        self.inner.write(&piece);
    }
}
