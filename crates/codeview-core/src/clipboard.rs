//! Clipboard access for the copy action.
//!
//! The controller only needs "write this text, tell me if it worked", so the
//! gateway is a one-method trait. [`SystemClipboard`] talks to the OS through
//! arboard; [`MemoryClipboard`] keeps writes in memory for headless runs.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write to clipboard: {0}")]
    WriteFailed(String),

    #[error("Clipboard write rejected")]
    Rejected,

    #[error("Clipboard task failed: {0}")]
    TaskFailed(String),
}

/// Asynchronous capability to place text on a clipboard.
pub trait ClipboardGateway: Send + Sync + 'static {
    fn write(&self, text: String) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// The operating system clipboard.
///
/// arboard calls block, so each write runs on tokio's blocking pool. On X11
/// the copied text is served only while this process is alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardGateway for SystemClipboard {
    async fn write(&self, text: String) -> Result<(), ClipboardError> {
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::TaskFailed(e.to_string()))?
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    writes: Mutex<Vec<String>>,
    reject: AtomicBool,
}

/// In-memory clipboard recording every accepted write.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    inner: Arc<MemoryInner>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write, like a denied permission.
    pub fn rejecting() -> Self {
        let clipboard = Self::default();
        clipboard.set_rejecting(true);
        clipboard
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.inner.reject.store(reject, Ordering::SeqCst);
    }

    /// All accepted writes, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.inner
            .writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current clipboard content.
    pub fn contents(&self) -> Option<String> {
        self.writes().pop()
    }
}

impl ClipboardGateway for MemoryClipboard {
    async fn write(&self, text: String) -> Result<(), ClipboardError> {
        if self.inner.reject.load(Ordering::SeqCst) {
            return Err(ClipboardError::Rejected);
        }
        self.inner
            .writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
        Ok(())
    }
}
