//! Home page reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use snakedex_core::routes::Route;

use super::state::CatalogState;
use crate::effects::UiEffect;
use crate::events::CatalogUiEvent;
use crate::features::toast::{ToastDuration, ToastLevel};
use crate::mutations::StateMutation;
use crate::overlays::OverlayRequest;

pub mod messages {
    pub const SAVED: &str = "บันทึกข้อมูลสำเร็จ!";
    pub const SAVE_FAILED: &str = "เกิดข้อผิดพลาดในการบันทึกข้อมูล";
    pub const DELETED: &str = "ลบข้อมูลงูสำเร็จ!";
    pub const DELETE_FAILED: &str = "ลบข้อมูลไม่สำเร็จ";
    pub const LOAD_FAILED: &str = "โหลดข้อมูลงูไม่สำเร็จ";
    pub const NO_IMAGE: &str = "ไม่มีลิงก์รูปภาพ";
}

/// Result of a key press on the home page.
#[derive(Debug, Default)]
pub struct HomeUpdate {
    pub effects: Vec<UiEffect>,
    pub mutations: Vec<StateMutation>,
    pub overlay: Option<OverlayRequest>,
}

impl HomeUpdate {
    fn effect(effect: UiEffect) -> Self {
        Self {
            effects: vec![effect],
            ..Self::default()
        }
    }

    fn overlay(request: OverlayRequest) -> Self {
        Self {
            overlay: Some(request),
            ..Self::default()
        }
    }
}

pub fn handle_home_key(state: &mut CatalogState, key: KeyEvent) -> HomeUpdate {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return HomeUpdate::default();
    }
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            HomeUpdate::default()
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            HomeUpdate::default()
        }
        KeyCode::Enter | KeyCode::Char('e') => match state.selected_snake() {
            Some(snake) => HomeUpdate::overlay(OverlayRequest::SnakeForm(Some(snake.clone()))),
            None => HomeUpdate::default(),
        },
        KeyCode::Delete | KeyCode::Char('d') => match state.selected_snake() {
            Some(snake) => HomeUpdate::overlay(OverlayRequest::ConfirmDelete(snake.clone())),
            None => HomeUpdate::default(),
        },
        KeyCode::Char('n') => HomeUpdate::overlay(OverlayRequest::SnakeForm(None)),
        KeyCode::Char('r') => {
            state.loading = true;
            HomeUpdate::effect(UiEffect::FetchSnakes)
        }
        KeyCode::Char('o') => {
            let url = state
                .selected_snake()
                .map(|s| s.image_url.trim())
                .filter(|u| !u.is_empty());
            match url {
                Some(url) => HomeUpdate::effect(UiEffect::OpenBrowser {
                    url: url.to_string(),
                }),
                None => HomeUpdate {
                    mutations: vec![StateMutation::toast(
                        ToastLevel::Error,
                        messages::NO_IMAGE,
                        ToastDuration::Catalog,
                    )],
                    ..HomeUpdate::default()
                },
            }
        }
        KeyCode::Char('l') => HomeUpdate {
            effects: vec![UiEffect::Logout],
            mutations: vec![
                StateMutation::ClearSession,
                StateMutation::Navigate(Route::Login),
            ],
            overlay: None,
        },
        KeyCode::Char('q') => HomeUpdate::effect(UiEffect::Quit),
        _ => HomeUpdate::default(),
    }
}

/// Applies a catalog call result to the list.
///
/// Closing the form on save is the caller's job, since the overlay lives
/// outside this slice.
pub fn handle_catalog_result(
    state: &mut CatalogState,
    event: CatalogUiEvent,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match event {
        CatalogUiEvent::Loaded { snakes } => {
            tracing::debug!(count = snakes.len(), "catalog loaded");
            state.replace(snakes);
            (vec![], vec![])
        }
        CatalogUiEvent::LoadFailed { error } => {
            tracing::warn!(%error, "failed to fetch catalog");
            state.loading = false;
            state.loaded = true;
            (vec![], vec![error_toast(messages::LOAD_FAILED)])
        }
        CatalogUiEvent::Saved { .. } => {
            state.loading = true;
            (
                vec![UiEffect::FetchSnakes],
                vec![StateMutation::toast(
                    ToastLevel::Success,
                    messages::SAVED,
                    ToastDuration::Catalog,
                )],
            )
        }
        CatalogUiEvent::SaveFailed { error, .. } => {
            tracing::warn!(%error, "failed to save record");
            (vec![], vec![error_toast(messages::SAVE_FAILED)])
        }
        CatalogUiEvent::Deleted => {
            state.loading = true;
            (
                vec![UiEffect::FetchSnakes],
                vec![StateMutation::toast(
                    ToastLevel::Success,
                    messages::DELETED,
                    ToastDuration::Catalog,
                )],
            )
        }
        CatalogUiEvent::DeleteFailed { error } => {
            tracing::warn!(%error, "failed to delete record");
            (vec![], vec![error_toast(messages::DELETE_FAILED)])
        }
        CatalogUiEvent::SessionLost => {
            state.loading = false;
            (
                vec![],
                vec![
                    StateMutation::ClearSession,
                    StateMutation::Navigate(Route::Login),
                ],
            )
        }
    }
}

fn error_toast(message: &str) -> StateMutation {
    StateMutation::toast(ToastLevel::Error, message, ToastDuration::Catalog)
}

#[cfg(test)]
mod tests {
    use snakedex_types::SnakeRecord;

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn loaded() -> CatalogState {
        let mut state = CatalogState::default();
        state.replace(vec![
            SnakeRecord {
                thai_name: "งูเห่า".into(),
                binomial: "Naja kaouthia".into(),
                image_url: " https://img.example/naja.jpg ".into(),
                ..SnakeRecord::default()
            },
            SnakeRecord {
                binomial: "Ptyas korros".into(),
                ..SnakeRecord::default()
            },
        ]);
        state
    }

    #[test]
    fn delete_key_asks_for_confirmation_first() {
        let mut state = loaded();
        let update = handle_home_key(&mut state, key('d'));
        assert!(update.effects.is_empty());
        match update.overlay {
            Some(OverlayRequest::ConfirmDelete(snake)) => assert_eq!(snake.binomial, "Naja kaouthia"),
            other => panic!("unexpected overlay: {other:?}"),
        }
    }

    #[test]
    fn edit_and_add_open_the_form() {
        let mut state = loaded();
        state.select_next();
        let update = handle_home_key(&mut state, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(
            update.overlay,
            Some(OverlayRequest::SnakeForm(Some(ref s))) if s.binomial == "Ptyas korros"
        ));

        let update = handle_home_key(&mut state, key('n'));
        assert!(matches!(update.overlay, Some(OverlayRequest::SnakeForm(None))));
    }

    #[test]
    fn open_image_uses_trimmed_url() {
        let mut state = loaded();
        let update = handle_home_key(&mut state, key('o'));
        assert_eq!(
            update.effects,
            vec![UiEffect::OpenBrowser {
                url: "https://img.example/naja.jpg".into()
            }]
        );

        state.select_next();
        let update = handle_home_key(&mut state, key('o'));
        assert!(update.effects.is_empty());
        assert_eq!(update.mutations.len(), 1);
    }

    #[test]
    fn logout_clears_session_and_goes_to_login() {
        let mut state = loaded();
        let update = handle_home_key(&mut state, key('l'));
        assert_eq!(update.effects, vec![UiEffect::Logout]);
        assert_eq!(
            update.mutations,
            vec![
                StateMutation::ClearSession,
                StateMutation::Navigate(Route::Login)
            ]
        );
    }

    #[test]
    fn deleted_refetches_instead_of_removing_locally() {
        let mut state = loaded();
        let (effects, mutations) = handle_catalog_result(&mut state, CatalogUiEvent::Deleted);
        assert_eq!(effects, vec![UiEffect::FetchSnakes]);
        assert_eq!(state.snakes.len(), 2);
        assert!(state.loading);
        assert_eq!(
            mutations,
            vec![StateMutation::toast(
                ToastLevel::Success,
                messages::DELETED,
                ToastDuration::Catalog
            )]
        );
    }

    #[test]
    fn load_failure_keeps_previous_list() {
        let mut state = loaded();
        state.loading = true;
        let (effects, mutations) = handle_catalog_result(
            &mut state,
            CatalogUiEvent::LoadFailed {
                error: "HTTP 500".into(),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(mutations, vec![error_toast(messages::LOAD_FAILED)]);
        assert_eq!(state.snakes.len(), 2);
        assert!(!state.loading);
    }
}
