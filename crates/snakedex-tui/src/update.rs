//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use snakedex_core::routes::{self, Route};
use snakedex_core::store::StoreSnapshot;

use crate::effects::UiEffect;
use crate::events::{CatalogUiEvent, UiEvent};
use crate::features::{auth, catalog};
use crate::mutations::{NavDelay, StateMutation, ToastMutation};
use crate::overlays::{Overlay, OverlayTransition, OverlayUpdate};
use crate::state::{AppState, Page, PendingNavigation};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => handle_tick(app, Instant::now()),
        UiEvent::Frame { width, height } => {
            app.tui.terminal_size = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Navigate(route) => navigate(app, route),
        UiEvent::StoreChanged(snapshot) => handle_store_changed(app, snapshot),
        UiEvent::Auth(event) => {
            let mutations = auth::handle_auth_result(&mut app.tui.page, event);
            apply_mutations(app, mutations)
        }
        UiEvent::Catalog(event) => handle_catalog_event(app, event),
    }
}

/// Expires toasts and fires a due scheduled navigation.
fn handle_tick(app: &mut AppState, now: Instant) -> Vec<UiEffect> {
    app.tui.toasts.prune(now);
    match app.tui.pending_nav.take() {
        Some(pending) if pending.at <= now => navigate(app, pending.route),
        still_waiting => {
            app.tui.pending_nav = still_waiting;
            vec![]
        }
    }
}

/// Mounts a route through the session guard.
///
/// Mounting the login page with a session goes straight to the list, and
/// mounting the list starts a fetch.
fn navigate(app: &mut AppState, route: Route) -> Vec<UiEffect> {
    let has_session = app.tui.has_session;
    let route = match routes::guard(route, has_session) {
        Route::Login if has_session => Route::Home,
        other => other,
    };
    tracing::debug!(route = %route, "mounting route");

    app.overlay = None;
    app.tui.pending_nav = None;
    app.tui.page = Page::for_route(&route);
    app.tui.route = route;

    if app.tui.route == Route::Home {
        app.tui.catalog.loading = true;
        vec![UiEffect::FetchSnakes]
    } else {
        vec![]
    }
}

fn handle_store_changed(app: &mut AppState, snapshot: StoreSnapshot) -> Vec<UiEffect> {
    app.tui.theme = snapshot.theme;
    app.tui.has_session = snapshot.has_session;
    if !snapshot.has_session && app.tui.route.is_protected() {
        tracing::info!("session gone; returning to login");
        return navigate(app, Route::Login);
    }
    vec![]
}

fn handle_catalog_event(app: &mut AppState, event: CatalogUiEvent) -> Vec<UiEffect> {
    match &event {
        // Results for a form that has since been closed or replaced leave
        // the current overlay alone.
        CatalogUiEvent::Saved { form } => {
            if matches!(&app.overlay, Some(Overlay::SnakeForm(open)) if open.id == *form) {
                app.overlay = None;
            }
        }
        CatalogUiEvent::SaveFailed { form, .. } => {
            // Keep the form and its input so the user can retry.
            if let Some(open) = app
                .overlay
                .as_mut()
                .and_then(Overlay::as_snake_form_mut)
                .filter(|open| open.id == *form)
            {
                open.submitting = false;
            }
        }
        _ => {}
    }
    let (mut effects, mutations) = catalog::handle_catalog_result(&mut app.tui.catalog, event);
    effects.extend(apply_mutations(app, mutations));
    effects
}

fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for mutation in mutations {
        match mutation {
            StateMutation::Navigate(route) => effects.extend(navigate(app, route)),
            StateMutation::NavigateLater { route, delay } => {
                let wait = match delay {
                    NavDelay::LoginAck => app.tui.notifications.login_ack(),
                    NavDelay::ResetRedirect => app.tui.notifications.reset_redirect(),
                };
                app.tui.pending_nav = Some(PendingNavigation {
                    route,
                    at: Instant::now() + wait,
                });
            }
            StateMutation::Toast(ToastMutation::Push {
                level,
                message,
                duration,
            }) => {
                let ttl = duration.resolve(&app.tui.notifications);
                app.tui.toasts.push(level, message, ttl, Instant::now());
            }
            StateMutation::ClearSession => {
                app.tui.has_session = false;
            }
        }
    }
    effects
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    if matches!(update.transition, OverlayTransition::Close) {
        app.overlay = None;
    }
    let mut effects = update.effects;
    effects.extend(apply_mutations(app, update.mutations));
    effects
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse);
            vec![]
        }
        Event::Paste(text) => {
            // The list page has no text input; pasted letters would be commands.
            if app.overlay.is_none() && matches!(app.tui.page, Page::Home) {
                return vec![];
            }
            let mut effects = Vec::new();
            for c in text.chars().filter(|c| !c.is_control()) {
                let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
                effects.extend(handle_key(app, key));
            }
            effects
        }
        _ => vec![],
    }
}

/// A left press outside the form modal dismisses it.
fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if let Some(Overlay::SnakeForm(form)) = &app.overlay
        && !form.contains(mouse.column, mouse.row)
    {
        app.overlay = None;
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::Char('t') if ctrl => return vec![UiEffect::ToggleTheme],
        KeyCode::F(2) => return vec![UiEffect::ToggleTheme],
        _ => {}
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&app.tui, key);
        return apply_overlay_update(app, update);
    }

    let (effects, mutations, overlay) = match &mut app.tui.page {
        Page::Login(page) => {
            let (effects, mutations) = auth::handle_login_key(page, key);
            (effects, mutations, None)
        }
        Page::ForgotPassword(page) => {
            let (effects, mutations) = auth::handle_forgot_key(page, key);
            (effects, mutations, None)
        }
        Page::ResetPassword(page) => {
            let (effects, mutations) = auth::handle_reset_key(page, key);
            (effects, mutations, None)
        }
        Page::Home => {
            let update = catalog::handle_home_key(&mut app.tui.catalog, key);
            (update.effects, update.mutations, update.overlay)
        }
    };

    let mut effects = effects;
    effects.extend(apply_mutations(app, mutations));
    if let Some(request) = overlay {
        app.overlay = Some(Overlay::open(request));
    }
    effects
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyEventState;
    use snakedex_core::store::{ThemeMode, ThemePreference};
    use snakedex_types::SnakeRecord;

    use super::*;
    use crate::events::AuthUiEvent;
    use crate::features::auth::messages as auth_messages;
    use crate::features::catalog::messages as catalog_messages;
    use crate::overlays::{FormId, FormMode};

    fn snapshot(has_session: bool) -> StoreSnapshot {
        StoreSnapshot {
            has_session,
            theme_preference: ThemePreference::Auto,
            theme: ThemeMode::Light,
        }
    }

    fn app_with_session(has_session: bool) -> AppState {
        AppState::new(snapshot(has_session), Default::default())
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::CONTROL,
            ))),
        )
    }

    fn home_with(app: &mut AppState, snakes: Vec<SnakeRecord>) {
        let effects = update(app, UiEvent::Navigate(Route::Home));
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        update(app, UiEvent::Catalog(CatalogUiEvent::Loaded { snakes }));
    }

    fn submitted_form(effects: &[UiEffect]) -> FormId {
        match effects {
            [UiEffect::SaveSnake { form, .. }] => *form,
            other => panic!("expected one save, got {other:?}"),
        }
    }

    fn naja() -> SnakeRecord {
        SnakeRecord {
            thai_name: "งูเห่า".into(),
            binomial: "Naja naja".into(),
            ..SnakeRecord::default()
        }
    }

    #[test]
    fn protected_route_without_session_redirects_to_login() {
        let mut app = app_with_session(false);
        let effects = update(&mut app, UiEvent::Navigate(Route::Home));
        assert!(effects.is_empty());
        assert_eq!(app.tui.route, Route::Login);
    }

    #[test]
    fn login_page_with_session_skips_to_list() {
        let mut app = app_with_session(true);
        let effects = update(&mut app, UiEvent::Navigate(Route::Login));
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert_eq!(app.tui.route, Route::Home);
    }

    #[test]
    fn forgot_and_reset_are_reachable_with_session() {
        let mut app = app_with_session(true);
        update(&mut app, UiEvent::Navigate(Route::ForgotPassword));
        assert_eq!(app.tui.route, Route::ForgotPassword);
    }

    #[test]
    fn session_loss_on_list_returns_to_login() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![naja()]);
        press(&mut app, KeyCode::Char('e'));
        assert!(app.overlay.is_some());

        let effects = update(&mut app, UiEvent::StoreChanged(snapshot(false)));
        assert!(effects.is_empty());
        assert_eq!(app.tui.route, Route::Login);
        assert!(app.overlay.is_none());
    }

    #[test]
    fn session_lost_event_also_returns_to_login() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![]);
        update(&mut app, UiEvent::Catalog(CatalogUiEvent::SessionLost));
        assert_eq!(app.tui.route, Route::Login);
        assert!(!app.tui.has_session);
    }

    #[test]
    fn delete_flow_confirms_then_refetches() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![naja()]);

        let effects = press(&mut app, KeyCode::Char('d'));
        assert!(effects.is_empty());
        assert!(matches!(app.overlay, Some(Overlay::ConfirmDelete(_))));

        let effects = press(&mut app, KeyCode::Char('y'));
        assert_eq!(
            effects,
            vec![UiEffect::DeleteSnake {
                binomial: "Naja naja".into()
            }]
        );
        assert!(app.overlay.is_none());

        let effects = update(&mut app, UiEvent::Catalog(CatalogUiEvent::Deleted));
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert_eq!(app.tui.toasts.items()[0].message, catalog_messages::DELETED);
    }

    #[test]
    fn form_with_blank_required_fields_issues_no_call() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![]);
        press(&mut app, KeyCode::Char('n'));
        let effects = ctrl(&mut app, 's');
        assert!(effects.is_empty());
        let Some(Overlay::SnakeForm(form)) = &app.overlay else {
            panic!("form closed");
        };
        assert!(form.error.is_some());
    }

    #[test]
    fn save_failure_keeps_form_and_input() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![naja()]);
        press(&mut app, KeyCode::Enter);
        let form = submitted_form(&ctrl(&mut app, 's'));

        update(
            &mut app,
            UiEvent::Catalog(CatalogUiEvent::SaveFailed {
                form,
                error: "HTTP 500".into(),
            }),
        );
        let Some(Overlay::SnakeForm(form)) = &app.overlay else {
            panic!("form closed on failure");
        };
        assert!(!form.submitting);
        assert_eq!(form.record.binomial, "Naja naja");
        assert_eq!(
            app.tui.toasts.items()[0].message,
            catalog_messages::SAVE_FAILED
        );
    }

    #[test]
    fn save_success_closes_form_and_refetches() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![naja()]);
        press(&mut app, KeyCode::Enter);
        let form = submitted_form(&ctrl(&mut app, 's'));

        let effects = update(&mut app, UiEvent::Catalog(CatalogUiEvent::Saved { form }));
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert!(app.overlay.is_none());
        assert_eq!(app.tui.toasts.items()[0].message, catalog_messages::SAVED);
    }

    #[test]
    fn late_save_result_leaves_a_newer_form_open() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![naja()]);
        press(&mut app, KeyCode::Enter);
        let earlier = submitted_form(&ctrl(&mut app, 's'));
        press(&mut app, KeyCode::Esc);
        assert!(app.overlay.is_none());

        press(&mut app, KeyCode::Char('n'));
        let Some(Overlay::SnakeForm(newer)) = &app.overlay else {
            panic!("create form not opened");
        };
        assert_ne!(newer.id, earlier);

        let effects = update(
            &mut app,
            UiEvent::Catalog(CatalogUiEvent::Saved { form: earlier }),
        );
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert!(matches!(&app.overlay, Some(Overlay::SnakeForm(open)) if open.mode == FormMode::Create));

        update(
            &mut app,
            UiEvent::Catalog(CatalogUiEvent::SaveFailed {
                form: earlier,
                error: "HTTP 500".into(),
            }),
        );
        assert!(matches!(&app.overlay, Some(Overlay::SnakeForm(open)) if open.mode == FormMode::Create));
    }

    #[test]
    fn left_click_outside_form_closes_it() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![]);
        press(&mut app, KeyCode::Char('n'));
        // Never rendered, so the popup is empty and every click is outside.
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        update(&mut app, UiEvent::Terminal(Event::Mouse(click)));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn logout_goes_to_login_and_clears_store() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![]);
        let effects = press(&mut app, KeyCode::Char('l'));
        assert_eq!(effects, vec![UiEffect::Logout]);
        assert_eq!(app.tui.route, Route::Login);
    }

    #[test]
    fn login_success_redirects_after_acknowledgment() {
        let mut app = app_with_session(false);
        update(&mut app, UiEvent::Navigate(Route::Login));
        update(&mut app, UiEvent::Auth(AuthUiEvent::LoginSucceeded));
        update(&mut app, UiEvent::StoreChanged(snapshot(true)));
        assert_eq!(app.tui.route, Route::Login);
        assert_eq!(app.tui.toasts.items()[0].message, auth_messages::LOGIN_OK);

        let at = app.tui.pending_nav.as_ref().map(|p| p.at).unwrap();
        assert!(handle_tick(&mut app, at - Duration::from_millis(1)).is_empty());
        assert_eq!(app.tui.route, Route::Login);

        let effects = handle_tick(&mut app, at);
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert_eq!(app.tui.route, Route::Home);
    }

    #[test]
    fn reset_mismatch_never_emits_a_call() {
        let mut app = app_with_session(false);
        update(
            &mut app,
            UiEvent::Navigate(Route::ResetPassword {
                token: Some("R".into()),
            }),
        );
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('b'));
        let effects = press(&mut app, KeyCode::Enter);
        assert!(effects.is_empty());
        let Page::ResetPassword(page) = &app.tui.page else {
            panic!("left reset page");
        };
        assert_eq!(
            page.message.as_ref().map(|m| m.text.as_str()),
            Some(auth_messages::PASSWORD_MISMATCH)
        );
    }

    #[test]
    fn global_keys_work_over_overlays() {
        let mut app = app_with_session(true);
        home_with(&mut app, vec![]);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(press(&mut app, KeyCode::F(2)), vec![UiEffect::ToggleTheme]);
        assert_eq!(ctrl(&mut app, 'c'), vec![UiEffect::Quit]);
        assert!(app.overlay.is_some());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app_with_session(false);
        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        update(&mut app, UiEvent::Terminal(Event::Key(release)));
        let Page::Login(page) = &app.tui.page else {
            panic!("not on login");
        };
        assert!(page.email.is_empty());
    }

    #[test]
    fn tick_prunes_expired_toasts() {
        let mut app = app_with_session(false);
        update(
            &mut app,
            UiEvent::Auth(AuthUiEvent::LoginFailed {
                error: "HTTP 401".into(),
            }),
        );
        assert_eq!(app.tui.toasts.items().len(), 1);
        handle_tick(&mut app, Instant::now() + Duration::from_secs(4));
        assert!(app.tui.toasts.is_empty());
    }
}
