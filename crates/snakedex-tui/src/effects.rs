//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs I/O
//! directly.

use snakedex_types::SnakeRecord;

use crate::overlays::FormId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// `POST /login`, then store the token.
    Login { email: String, password: String },

    /// `POST /forgot-password`.
    RequestPasswordReset { email: String },

    /// `POST /reset-password`.
    ResetPassword { token: String, new_password: String },

    /// Re-fetch the whole catalog.
    FetchSnakes,

    /// Create (`original_binomial == None`) or update a record.
    SaveSnake {
        form: FormId,
        original_binomial: Option<String>,
        record: SnakeRecord,
    },

    DeleteSnake { binomial: String },

    /// Clear the stored session.
    Logout,

    /// Flip and persist the theme.
    ToggleTheme,

    /// Open a URL in the system browser.
    OpenBrowser { url: String },
}
