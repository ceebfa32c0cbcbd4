//! Cross-slice state mutations.
//!
//! Feature reducers and overlays return these mutations to request changes
//! outside their own slice. The main reducer applies them in order.

use snakedex_core::routes::Route;

use crate::features::toast::{ToastDuration, ToastLevel};

/// Mutations for cross-slice state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMutation {
    /// Mount a route now.
    Navigate(Route),
    /// Mount a route once the delay has elapsed.
    NavigateLater { route: Route, delay: NavDelay },
    Toast(ToastMutation),
    /// Forget the session locally; the store is cleared by an effect or
    /// already was.
    ClearSession,
}

/// Which configured delay a scheduled navigation waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDelay {
    LoginAck,
    ResetRedirect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastMutation {
    Push {
        level: ToastLevel,
        message: String,
        duration: ToastDuration,
    },
}

impl StateMutation {
    pub fn toast(level: ToastLevel, message: impl Into<String>, duration: ToastDuration) -> Self {
        StateMutation::Toast(ToastMutation::Push {
            level,
            message: message.into(),
            duration,
        })
    }
}
