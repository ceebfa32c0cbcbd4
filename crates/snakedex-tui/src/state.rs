//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── route / page: Page      (mounted route and its form state)
//! │   ├── catalog: CatalogState   (home list, survives page switches)
//! │   ├── toasts: ToastState      (transient notifications)
//! │   ├── has_session / theme     (mirrors of the AppStore snapshot)
//! │   └── pending_nav             (delayed redirect)
//! └── overlay: Option<Overlay>    (form modal or delete confirmation)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can get `&mut self` and `&TuiState` at the same time.

use std::time::Instant;

use snakedex_core::config::NotificationConfig;
use snakedex_core::routes::Route;
use snakedex_core::store::{StoreSnapshot, ThemeMode};

use crate::features::auth::{ForgotPage, LoginPage, ResetPage};
use crate::features::catalog::CatalogState;
use crate::features::theme::Palette;
use crate::features::toast::ToastState;
use crate::overlays::Overlay;

// ============================================================================
// AppState (Combined State)
// ============================================================================

/// Combined application state for the TUI.
#[derive(Default)]
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(snapshot: StoreSnapshot, notifications: NotificationConfig) -> Self {
        Self {
            tui: TuiState::new(snapshot, notifications),
            overlay: None,
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// Per-route page state. Re-created every time a route is mounted.
#[derive(Debug)]
pub enum Page {
    Login(LoginPage),
    ForgotPassword(ForgotPage),
    ResetPassword(ResetPage),
    /// The list itself lives in `TuiState::catalog`.
    Home,
}

impl Page {
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Login => Page::Login(LoginPage::default()),
            Route::ForgotPassword => Page::ForgotPassword(ForgotPage::default()),
            Route::ResetPassword { token } => Page::ResetPassword(ResetPage::new(token.clone())),
            Route::Home => Page::Home,
        }
    }
}

/// A navigation scheduled for a later tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub route: Route,
    pub at: Instant,
}

// ============================================================================
// TuiState
// ============================================================================

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub route: Route,
    pub page: Page,
    pub catalog: CatalogState,
    pub toasts: ToastState,
    pub notifications: NotificationConfig,
    pub has_session: bool,
    pub theme: ThemeMode,
    pub pending_nav: Option<PendingNavigation>,
    /// Last known terminal size (width, height).
    pub terminal_size: (u16, u16),
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            should_quit: false,
            route: Route::Login,
            page: Page::Login(LoginPage::default()),
            catalog: CatalogState::default(),
            toasts: ToastState::default(),
            notifications: NotificationConfig::default(),
            has_session: false,
            theme: ThemeMode::Light,
            pending_nav: None,
            terminal_size: (0, 0),
        }
    }
}

impl TuiState {
    pub fn new(snapshot: StoreSnapshot, notifications: NotificationConfig) -> Self {
        Self {
            has_session: snapshot.has_session,
            theme: snapshot.theme,
            notifications,
            ..Self::default()
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_page_takes_token_from_route() {
        let page = Page::for_route(&Route::ResetPassword {
            token: Some("R".into()),
        });
        assert!(matches!(page, Page::ResetPassword(p) if p.token.as_deref() == Some("R")));
    }

    #[test]
    fn new_state_mirrors_snapshot() {
        let snapshot = StoreSnapshot {
            has_session: true,
            theme_preference: snakedex_core::store::ThemePreference::Dark,
            theme: ThemeMode::Dark,
        };
        let state = TuiState::new(snapshot, NotificationConfig::default());
        assert!(state.has_session);
        assert!(state.theme.is_dark());
        assert_eq!(state.route, Route::Login);
    }
}
