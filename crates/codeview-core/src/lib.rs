//! # Codeview Core
//!
//! State and orchestration for the documentation code viewer.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ViewController                        │
//! │  ┌──────────────┐ ┌──────────────┐ ┌───────────────────┐ │
//! │  │ SnippetStore │ │  Highlighter │ │ ClipboardGateway  │ │
//! │  └──────────────┘ └──────────────┘ └───────────────────┘ │
//! │         │                                                 │
//! │  ┌──────┴────────────────────────────────────┐            │
//! │  │                 ViewState                  │            │
//! │  │  Phase · TabStrip · DisplaySurface · Copy  │            │
//! │  └────────────────────────────────────────────┘            │
//! │  DeferredSlot(swap)        DeferredSlot(confirmation)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Deferred Work Without Globals
//!
//! Timed steps (the content swap and the "copied" revert) are tokio tasks
//! held in a single slot per channel. Scheduling into a slot aborts whatever
//! was pending there, so a newer request always supersedes an older one.

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod event;
pub mod scheduler;
pub mod snippet;
pub mod surface;

pub use clipboard::{ClipboardError, ClipboardGateway, MemoryClipboard, SystemClipboard};
pub use config::Config;
pub use controller::{Phase, SwitchOutcome, ViewController};
pub use event::{EventBus, EventHandler, ViewEvent};
pub use scheduler::DeferredSlot;
pub use snippet::{Snippet, SnippetStore};
pub use surface::{CopyConfirmation, DisplaySurface, TabStrip, Visibility};

/// Result type for core operations
pub type CoreResult<T> = Result<T, ViewError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// A tab identifier with no snippet behind it. This is a wiring mistake
    /// between the tab controls and the snippet table, not a runtime
    /// condition.
    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("No tokio runtime available for deferred work")]
    NoRuntime,

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
