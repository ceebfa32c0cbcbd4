//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers return a `UiEvent`; `spawn_effect` sends it to `inbox_tx`
//! - Runtime drains `inbox_rx` each frame to collect results
//! - Store snapshots arrive on a `watch` channel and become `StoreChanged`
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers/`: Effect handler implementations (HTTP calls)

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use snakedex_core::api::CatalogClient;
use snakedex_core::config::Config;
use snakedex_core::routes::Route;
use snakedex_core::session::SessionGuard;
use snakedex_core::store::{AppStore, StoreSnapshot};
use tokio::sync::{mpsc, watch};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::Tui;
use crate::{render, terminal, update};

/// Tick interval while the user is interacting.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick interval when idle. Toast expiry and delayed redirects only need
/// this resolution.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: Tui,
    /// Application state (split: tui + overlay).
    pub state: AppState,
    /// Inbox sender - handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    /// Snapshot feed from the session/theme store.
    store_rx: watch::Receiver<StoreSnapshot>,
    /// Client plus store; every protected call goes through it.
    guard: SessionGuard,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Creates the runtime and queues the initial navigation to `start_route`.
    pub fn new(config: &Config, store: AppStore, start_route: Route) -> Result<Self> {
        let client = CatalogClient::from_config(config)?;

        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let mut store_rx = store.subscribe();
        let snapshot = *store_rx.borrow_and_update();
        let state = AppState::new(snapshot, config.notifications.clone());

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let _ = inbox_tx.send(UiEvent::Navigate(start_route));

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            store_rx,
            guard: SessionGuard::new(client, store),
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Frame goes first so layout-dependent handlers see the new size.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only Tick triggers render; other events batch until the next Tick.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                self.dispatch_event(event);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the store feed, the inbox and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_store_events(&mut events);
        self.collect_inbox_events(&mut events);

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());

        // Block until the next tick only when there is nothing to process.
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    /// Picks up the latest store snapshot, if it changed.
    ///
    /// Store changes are collected before inbox results so a call result
    /// never sees a stale session flag.
    fn collect_store_events(&mut self, events: &mut Vec<UiEvent>) {
        if self.store_rx.has_changed().unwrap_or(false) {
            events.push(UiEvent::StoreChanged(*self.store_rx.borrow_and_update()));
        }
    }

    /// Drains all events from the inbox channel.
    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async effect and sends its result event to the inbox.
    ///
    /// Handlers stay pure async functions that return `UiEvent`, while the
    /// runtime handles spawning.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            // Simple effects (inline)
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::OpenBrowser { url } => {
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, error = %e, "failed to open browser");
                }
            }
            UiEffect::Logout => {
                if let Err(e) = self.guard.store().clear_session() {
                    tracing::error!(error = %format!("{e:#}"), "failed to clear session");
                }
            }
            UiEffect::ToggleTheme => match self.guard.store().toggle_theme() {
                Ok(mode) => tracing::debug!(theme = mode.as_str(), "theme toggled"),
                Err(e) => tracing::error!(error = %format!("{e:#}"), "failed to persist theme"),
            },

            // Auth calls (no session needed)
            UiEffect::Login { email, password } => {
                let client = self.guard.client().clone();
                let store = self.guard.store().clone();
                self.spawn_effect(move || handlers::login(client, store, email, password));
            }
            UiEffect::RequestPasswordReset { email } => {
                let client = self.guard.client().clone();
                self.spawn_effect(move || handlers::forgot_password(client, email));
            }
            UiEffect::ResetPassword {
                token,
                new_password,
            } => {
                let client = self.guard.client().clone();
                self.spawn_effect(move || handlers::reset_password(client, token, new_password));
            }

            // Protected calls
            UiEffect::FetchSnakes => {
                let guard = self.guard.clone();
                self.spawn_effect(move || handlers::fetch_snakes(guard));
            }
            UiEffect::SaveSnake {
                form,
                original_binomial,
                record,
            } => {
                let guard = self.guard.clone();
                self.spawn_effect(move || {
                    handlers::save_snake(guard, form, original_binomial, record)
                });
            }
            UiEffect::DeleteSnake { binomial } => {
                let guard = self.guard.clone();
                self.spawn_effect(move || handlers::delete_snake(guard, binomial));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
