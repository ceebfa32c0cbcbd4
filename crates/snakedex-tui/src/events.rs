//! UI event types.
//!
//! All inputs to the TUI (terminal, store notifications, async results) are
//! converted to `UiEvent` before being processed by the reducer.
//!
//! ## Inbox Pattern
//!
//! Async handlers return a `UiEvent`; the runtime sends it to its inbox and
//! drains the inbox each frame. Loading flags are set by the reducer when it
//! emits the effect, so there are no separate `*Started` events.

use crossterm::event::Event as CrosstermEvent;
use snakedex_core::routes::Route;
use snakedex_core::store::StoreSnapshot;
use snakedex_types::SnakeRecord;

use crate::overlays::FormId;

/// Results of the unauthenticated auth calls.
#[derive(Debug)]
pub enum AuthUiEvent {
    /// Token received and stored.
    LoginSucceeded,
    LoginFailed { error: String },
    ResetEmailSent,
    ResetEmailFailed { error: String },
    PasswordReset,
    PasswordResetFailed { error: String },
}

/// Results of protected catalog calls.
///
/// An expired session also reaches the reducer as `StoreChanged`, since the
/// guard clears the store before the call result is sent.
#[derive(Debug)]
pub enum CatalogUiEvent {
    Loaded { snakes: Vec<SnakeRecord> },
    LoadFailed { error: String },
    /// `form` is the form that submitted the save.
    Saved { form: FormId },
    SaveFailed { form: FormId, error: String },
    Deleted,
    DeleteFailed { error: String },
    /// The call was refused because the session is gone.
    SessionLost,
}

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (toast expiry, delayed navigation).
    Tick,

    /// Frame with current terminal size, emitted before other events.
    Frame { width: u16, height: u16 },

    /// Raw terminal event.
    Terminal(CrosstermEvent),

    /// Mount a route (initial route, links, delayed redirects).
    Navigate(Route),

    /// The session/theme store published a new snapshot.
    StoreChanged(StoreSnapshot),

    Auth(AuthUiEvent),

    Catalog(CatalogUiEvent),
}
