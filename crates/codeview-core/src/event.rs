//! Event system for view notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rather than holding callbacks, the controller broadcasts values over a
//! `tokio::sync::broadcast` channel. A render layer subscribes and repaints
//! the tab strip, the code surface or the copy button as events arrive.

use tokio::sync::broadcast;

/// Events emitted by the view controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A tab was marked active (synchronous with the request)
    TabSelected(String),
    /// The surface was hidden and a content swap scheduled
    SwapStarted { from: String, to: String },
    /// A pending swap was replaced by a newer request
    SwapSuperseded { to: String },
    /// The surface shows the snippet and is visible again
    SwapCompleted(String),
    /// Text reached the clipboard
    CopySucceeded,
    /// The clipboard refused the write
    CopyFailed(String),
    /// The copy confirmation reverted to idle
    ConfirmationReset,
}

/// Event bus for broadcasting view events.
///
/// Sending never fails: with no subscribers the event is simply dropped.
pub struct EventBus {
    sender: broadcast::Sender<ViewEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: ViewEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Helper for processing events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(controller.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let ViewEvent::SwapCompleted(name) = event {
///             repaint(&name);
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<ViewEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<ViewEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<ViewEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns every event already queued, without waiting.
    pub fn drain(&mut self) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                }
                Err(_) => return events,
            }
        }
    }
}
