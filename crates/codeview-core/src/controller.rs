//! View controller: active snippet, timed content swap and copy action.
//!
//! ## Learning: Shared State Behind an `Arc`
//!
//! Deferred steps run as tokio tasks that outlive the call which scheduled
//! them, so the state they touch lives in an `Arc<Shared>`. Every mutation
//! goes through one `Mutex`, and no lock is ever held across an `.await`.
//!
//! ## Swap protocol
//!
//! ```text
//! switch_to(to)                      after swap_delay
//! ─────────────                      ────────────────
//! tab strip → to                     generation still current?
//! surface hidden                       content ← highlight(store[to])
//! generation += 1                      surface visible
//! phase = Transitioning(from, to)      phase = Idle(to)
//! ```
//!
//! A newer request bumps the generation and replaces the pending swap, so
//! only the last requested snippet is ever committed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use codeview_syntax::Highlighter;
use tokio::sync::broadcast;

use crate::clipboard::{ClipboardError, ClipboardGateway};
use crate::config::Config;
use crate::event::{EventBus, ViewEvent};
use crate::scheduler::DeferredSlot;
use crate::snippet::SnippetStore;
use crate::surface::{CopyConfirmation, DisplaySurface, TabStrip};
use crate::{CoreResult, ViewError};

/// Where the controller is in the swap protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Showing `active`, nothing pending
    Idle { active: String },
    /// Surface hidden, content for `to` scheduled
    Transitioning { from: String, to: String },
}

/// Result of a [`ViewController::switch_to`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// A swap was scheduled
    Scheduled,
    /// Already showing, or already heading to, the requested snippet
    Unchanged,
}

struct ViewState {
    phase: Phase,
    tabs: TabStrip,
    surface: DisplaySurface,
    confirmation: CopyConfirmation,
    swap_generation: u64,
    copy_generation: u64,
}

/// State reachable from deferred tasks.
struct Shared {
    store: Arc<SnippetStore>,
    highlighter: Highlighter,
    state: Mutex<ViewState>,
    events: EventBus,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(&self, name: &str) -> CoreResult<String> {
        let text = self.store.get(name)?;
        Ok(self.highlighter.highlight_source(text))
    }

    /// Deferred half of a switch.
    fn complete_swap(&self, generation: u64, to: String) {
        let markup = match self.render(&to) {
            Ok(markup) => markup,
            Err(err) => {
                tracing::error!(snippet = %to, "swap failed: {}", err);
                return;
            }
        };

        {
            let mut state = self.state();
            if state.swap_generation != generation {
                tracing::trace!(snippet = %to, generation, "dropping stale swap");
                return;
            }
            state.surface.set_markup(markup);
            state.surface.show();
            state.phase = Phase::Idle { active: to.clone() };
        }

        tracing::debug!(snippet = %to, "swap completed");
        self.events.emit(ViewEvent::SwapCompleted(to));
    }

    fn reset_confirmation(&self, generation: u64) {
        {
            let mut state = self.state();
            if state.copy_generation != generation {
                return;
            }
            state.confirmation.reset();
        }
        self.events.emit(ViewEvent::ConfirmationReset);
    }
}

/// Owns the viewer state and mediates every change to it.
///
/// Must be created inside a tokio runtime; deferred steps are spawned on it.
pub struct ViewController<C> {
    shared: Arc<Shared>,
    clipboard: C,
    swap: DeferredSlot,
    confirmation: DeferredSlot,
    config: Config,
}

impl<C: ClipboardGateway> ViewController<C> {
    /// Creates a controller with one tab per snippet, in store order.
    pub fn new(store: Arc<SnippetStore>, clipboard: C, config: Config) -> CoreResult<Self> {
        let tabs = store.names();
        Self::with_tabs(store, clipboard, config, tabs)
    }

    /// Creates a controller for an explicit set of tab controls.
    ///
    /// Every tab must have a snippet, and the configured default snippet is
    /// rendered immediately.
    pub fn with_tabs(
        store: Arc<SnippetStore>,
        clipboard: C,
        config: Config,
        tabs: Vec<String>,
    ) -> CoreResult<Self> {
        store.check_tabs(&tabs)?;

        let default = config.view.default_snippet.clone();
        let highlighter = Highlighter::new(config.view.highlight_mode);
        let markup = highlighter.highlight_source(store.get(&default)?);

        let state = ViewState {
            phase: Phase::Idle {
                active: default.clone(),
            },
            tabs: TabStrip::new(tabs, default.as_str()),
            surface: DisplaySurface::new(markup),
            confirmation: CopyConfirmation::new(
                config.copy.idle_label.as_str(),
                config.copy.copied_label.as_str(),
            ),
            swap_generation: 0,
            copy_generation: 0,
        };

        tracing::info!(
            snippet = %default,
            mode = %highlighter.mode(),
            snippets = store.len(),
            "view controller ready"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                highlighter,
                state: Mutex::new(state),
                events: EventBus::new(),
            }),
            clipboard,
            swap: DeferredSlot::new("swap")?,
            confirmation: DeferredSlot::new("confirmation")?,
            config,
        })
    }

    // ==================== Switching ====================

    /// Requests that `name` be shown.
    ///
    /// The tab strip updates right away; the content swap happens after the
    /// configured delay. Re-selecting the current (or pending) snippet is a
    /// no-op.
    pub fn switch_to(&self, name: &str) -> CoreResult<SwitchOutcome> {
        if !self.shared.store.contains(name) {
            tracing::error!(snippet = name, "no snippet for requested tab");
            return Err(ViewError::SnippetNotFound(name.to_string()));
        }

        let (from, superseded, generation) = {
            let mut state = self.shared.state();

            let (from, superseded) = match &state.phase {
                Phase::Idle { active } if active == name => {
                    return Ok(SwitchOutcome::Unchanged);
                }
                Phase::Transitioning { to, .. } if to == name => {
                    return Ok(SwitchOutcome::Unchanged);
                }
                Phase::Idle { active } => (active.clone(), None),
                Phase::Transitioning { from, to } => (from.clone(), Some(to.clone())),
            };

            if !state.tabs.select(name) {
                tracing::warn!(snippet = name, "selected snippet has no tab control");
            }
            state.surface.hide();
            state.swap_generation += 1;
            state.phase = Phase::Transitioning {
                from: from.clone(),
                to: name.to_string(),
            };

            (from, superseded, state.swap_generation)
        };

        let events = &self.shared.events;
        if let Some(to) = superseded {
            events.emit(ViewEvent::SwapSuperseded { to });
        }
        events.emit(ViewEvent::TabSelected(name.to_string()));
        events.emit(ViewEvent::SwapStarted {
            from,
            to: name.to_string(),
        });

        let shared = Arc::clone(&self.shared);
        let to = name.to_string();
        self.swap.schedule(self.config.view.swap_delay(), move || {
            shared.complete_swap(generation, to);
        });

        Ok(SwitchOutcome::Scheduled)
    }

    // ==================== Copy ====================

    /// Copies the plain text of the surface to the clipboard.
    ///
    /// On success the confirmation turns on and reverts after the configured
    /// delay; copying again restarts that single timer. Failures leave the
    /// confirmation untouched.
    pub async fn copy(&self) -> Result<(), ClipboardError> {
        let text = self.shared.state().surface.text_content();

        if let Err(err) = self.clipboard.write(text).await {
            tracing::debug!("clipboard write failed: {}", err);
            self.shared
                .events
                .emit(ViewEvent::CopyFailed(err.to_string()));
            return Err(err);
        }

        let generation = {
            let mut state = self.shared.state();
            state.confirmation.confirm();
            state.copy_generation += 1;
            state.copy_generation
        };
        self.shared.events.emit(ViewEvent::CopySucceeded);

        let shared = Arc::clone(&self.shared);
        self.confirmation
            .schedule(self.config.copy.confirmation_delay(), move || {
                shared.reset_confirmation(generation);
            });

        Ok(())
    }

    // ==================== Accessors ====================

    /// The snippet last committed to the surface.
    pub fn active(&self) -> String {
        match &self.shared.state().phase {
            Phase::Idle { active } => active.clone(),
            Phase::Transitioning { from, .. } => from.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.shared.state().phase.clone()
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.shared.state().phase, Phase::Transitioning { .. })
    }

    /// The tab currently marked active.
    pub fn selected_tab(&self) -> String {
        self.shared.state().tabs.selected().to_string()
    }

    pub fn tabs(&self) -> TabStrip {
        self.shared.state().tabs.clone()
    }

    /// A snapshot of the code surface.
    pub fn surface(&self) -> DisplaySurface {
        self.shared.state().surface.clone()
    }

    /// A snapshot of the copy button state.
    pub fn confirmation(&self) -> CopyConfirmation {
        self.shared.state().confirmation.clone()
    }

    pub fn store(&self) -> &SnippetStore {
        &self.shared.store
    }

    pub fn highlighter(&self) -> Highlighter {
        self.shared.highlighter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Returns true while a content swap is scheduled.
    pub fn swap_pending(&self) -> bool {
        self.swap.is_pending()
    }

    /// Returns true while the copy confirmation is waiting to revert.
    pub fn confirmation_pending(&self) -> bool {
        self.confirmation.is_pending()
    }

    /// Subscribes to view events.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.shared.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::event::EventHandler;
    use codeview_syntax::HighlightMode;
    use std::time::Duration;
    use tokio::time::sleep;

    const SWAP: Duration = Duration::from_millis(150);
    const CONFIRM: Duration = Duration::from_millis(2000);

    fn controller() -> ViewController<MemoryClipboard> {
        controller_with(MemoryClipboard::new(), Config::default())
    }

    fn controller_with(clipboard: MemoryClipboard, config: Config) -> ViewController<MemoryClipboard> {
        ViewController::new(Arc::new(SnippetStore::builtin()), clipboard, config).unwrap()
    }

    fn expected_markup(controller: &ViewController<MemoryClipboard>, name: &str) -> String {
        controller
            .highlighter()
            .highlight_source(controller.store().get(name).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        let view = controller();
        assert_eq!(view.phase(), Phase::Idle { active: "client".into() });
        assert_eq!(view.selected_tab(), "client");
        assert_eq!(view.surface().markup(), expected_markup(&view, "client"));
        assert_eq!(view.surface().opacity(), 1.0);
        assert!(!view.confirmation().is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_default_snippet() {
        let mut config = Config::default();
        config.view.default_snippet = "missing".into();
        let result = ViewController::new(
            Arc::new(SnippetStore::builtin()),
            MemoryClipboard::new(),
            config,
        );
        assert!(matches!(result, Err(ViewError::SnippetNotFound(name)) if name == "missing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_without_snippet_is_rejected() {
        let result = ViewController::with_tabs(
            Arc::new(SnippetStore::builtin()),
            MemoryClipboard::new(),
            Config::default(),
            vec!["client".into(), "update".into()],
        );
        assert!(matches!(result, Err(ViewError::SnippetNotFound(name)) if name == "update"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_every_tab() {
        let view = controller();
        for name in view.store().names() {
            view.switch_to(&name).unwrap();
            sleep(SWAP + Duration::from_millis(10)).await;

            assert_eq!(view.phase(), Phase::Idle { active: name.clone() });
            assert_eq!(view.active(), name);
            assert_eq!(view.surface().markup(), expected_markup(&view, &name));
            assert_eq!(view.surface().opacity(), 1.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_protocol_order() {
        let view = controller();
        let mut events = EventHandler::new(view.subscribe());

        assert_eq!(view.switch_to("insert").unwrap(), SwitchOutcome::Scheduled);

        // Tab indicator is immediate, content is not.
        assert_eq!(view.selected_tab(), "insert");
        assert!(view.tabs().is_active("insert"));
        assert_eq!(view.surface().opacity(), 0.0);
        assert_eq!(view.surface().markup(), expected_markup(&view, "client"));
        assert_eq!(view.active(), "client");
        assert_eq!(
            view.phase(),
            Phase::Transitioning { from: "client".into(), to: "insert".into() }
        );
        assert!(view.swap_pending());

        sleep(Duration::from_millis(100)).await;
        assert!(view.is_transitioning());

        sleep(Duration::from_millis(100)).await;
        assert!(!view.is_transitioning());
        assert!(!view.swap_pending());

        assert_eq!(
            events.drain(),
            vec![
                ViewEvent::TabSelected("insert".into()),
                ViewEvent::SwapStarted { from: "client".into(), to: "insert".into() },
                ViewEvent::SwapCompleted("insert".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselecting_is_a_noop() {
        let view = controller();
        assert_eq!(view.switch_to("client").unwrap(), SwitchOutcome::Unchanged);
        assert_eq!(view.surface().opacity(), 1.0);
        assert!(!view.swap_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_twice_same_as_once() {
        let once = controller();
        once.switch_to("select").unwrap();

        let twice = controller();
        twice.switch_to("select").unwrap();
        assert_eq!(twice.switch_to("select").unwrap(), SwitchOutcome::Unchanged);

        sleep(SWAP * 2).await;

        assert_eq!(once.phase(), twice.phase());
        assert_eq!(once.surface(), twice.surface());
        assert_eq!(once.selected_tab(), twice.selected_tab());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_request_wins() {
        let view = controller();
        let mut events = EventHandler::new(view.subscribe());

        view.switch_to("insert").unwrap();
        sleep(Duration::from_millis(50)).await;
        view.switch_to("marshal").unwrap();

        assert_eq!(
            view.phase(),
            Phase::Transitioning { from: "client".into(), to: "marshal".into() }
        );

        // Past the first request's deadline: it must not have landed.
        sleep(Duration::from_millis(120)).await;
        assert!(view.is_transitioning());
        assert_eq!(view.surface().markup(), expected_markup(&view, "client"));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(view.phase(), Phase::Idle { active: "marshal".into() });
        assert_eq!(view.surface().markup(), expected_markup(&view, "marshal"));
        assert_eq!(view.selected_tab(), "marshal");

        let completed: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, ViewEvent::SwapCompleted(_)))
            .collect();
        assert_eq!(completed, vec![ViewEvent::SwapCompleted("marshal".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_back_to_origin_during_transition() {
        let view = controller();
        view.switch_to("insert").unwrap();
        assert_eq!(view.switch_to("client").unwrap(), SwitchOutcome::Scheduled);

        sleep(SWAP * 2).await;
        assert_eq!(view.phase(), Phase::Idle { active: "client".into() });
        assert_eq!(view.surface().markup(), expected_markup(&view, "client"));
        assert_eq!(view.surface().opacity(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_snippet_leaves_state_alone() {
        let view = controller();
        assert!(matches!(
            view.switch_to("update"),
            Err(ViewError::SnippetNotFound(name)) if name == "update"
        ));
        assert_eq!(view.selected_tab(), "client");
        assert_eq!(view.surface().opacity(), 1.0);
        assert!(!view.swap_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_submits_original_text() {
        let clipboard = MemoryClipboard::new();
        let view = controller_with(clipboard.clone(), Config::default());

        view.switch_to("insert").unwrap();
        sleep(SWAP * 2).await;
        view.copy().await.unwrap();

        let original = view.store().get("insert").unwrap();
        assert_eq!(clipboard.writes(), vec![original.to_string()]);
        assert!(!clipboard.contents().unwrap().contains("<span"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_with_legacy_passes_is_still_plain() {
        let clipboard = MemoryClipboard::new();
        let mut config = Config::default();
        config.view.highlight_mode = HighlightMode::Passes;
        let view = controller_with(clipboard.clone(), config);

        view.switch_to("select").unwrap();
        sleep(SWAP * 2).await;
        view.copy().await.unwrap();

        assert_eq!(
            clipboard.contents().as_deref(),
            Some(view.store().get("select").unwrap())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_reverts() {
        let view = controller();

        view.copy().await.unwrap();
        assert!(view.confirmation().is_copied());
        assert_eq!(view.confirmation().label(), "Copied!");

        sleep(CONFIRM - Duration::from_millis(10)).await;
        assert!(view.confirmation().is_copied());

        sleep(Duration::from_millis(20)).await;
        assert!(!view.confirmation().is_copied());
        assert_eq!(view.confirmation().label(), "Copy");
        assert!(!view.confirmation_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_copy_restarts_timer() {
        let view = controller();
        let mut events = EventHandler::new(view.subscribe());

        view.copy().await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        view.copy().await.unwrap();

        // The first timer would have fired here.
        sleep(Duration::from_millis(1000)).await;
        assert!(view.confirmation().is_copied());
        assert!(view.confirmation_pending());

        sleep(Duration::from_millis(1100)).await;
        assert!(!view.confirmation().is_copied());
        assert!(!view.confirmation_pending());

        let resets = events
            .drain()
            .into_iter()
            .filter(|e| *e == ViewEvent::ConfirmationReset)
            .count();
        assert_eq!(resets, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_failure_is_silent() {
        let view = controller_with(MemoryClipboard::rejecting(), Config::default());
        let mut events = EventHandler::new(view.subscribe());

        assert!(matches!(view.copy().await, Err(ClipboardError::Rejected)));
        assert!(!view.confirmation().is_copied());
        assert!(!view.confirmation_pending());
        assert_eq!(
            events.drain(),
            vec![ViewEvent::CopyFailed("Clipboard write rejected".into())]
        );
    }
}
