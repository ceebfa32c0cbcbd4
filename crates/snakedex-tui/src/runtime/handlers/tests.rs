use std::time::Duration;

use serde_json::json;
use snakedex_core::api::CatalogClient;
use snakedex_core::session::SessionGuard;
use snakedex_core::store::AppStore;
use snakedex_types::SnakeRecord;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::events::{AuthUiEvent, CatalogUiEvent, UiEvent};
use crate::overlays::FormId;

fn client_for(server: &MockServer) -> CatalogClient {
    let base = Url::parse(&server.uri()).unwrap();
    CatalogClient::new(base, "/addsnake", Some(Duration::from_secs(5))).unwrap()
}

fn guard_with_token(server: &MockServer, token: Option<&str>) -> (SessionGuard, AppStore) {
    let store = AppStore::in_memory();
    if let Some(token) = token {
        store.set_session_token(token).unwrap();
    }
    (SessionGuard::new(client_for(server), store.clone()), store)
}

#[tokio::test]
async fn login_stores_token_before_reporting_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T1"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = AppStore::in_memory();
    let mut rx = store.subscribe();
    rx.mark_unchanged();

    let event = login(client_for(&server), store.clone(), "a@b.c".into(), "pw".into()).await;

    assert!(matches!(event, UiEvent::Auth(AuthUiEvent::LoginSucceeded)));
    assert_eq!(store.session_token().unwrap().as_deref(), Some("T1"));
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow().has_session);
}

#[tokio::test]
async fn rejected_login_leaves_store_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = AppStore::in_memory();
    let event = login(client_for(&server), store.clone(), "a@b.c".into(), "bad".into()).await;

    assert!(matches!(
        event,
        UiEvent::Auth(AuthUiEvent::LoginFailed { .. })
    ));
    assert!(!store.has_session());
}

#[tokio::test]
async fn forgot_password_maps_status_to_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forgot-password"))
        .and(body_json(json!({"email": "known@x.y"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/forgot-password"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ok = forgot_password(client_for(&server), "known@x.y".into()).await;
    assert!(matches!(ok, UiEvent::Auth(AuthUiEvent::ResetEmailSent)));

    let failed = forgot_password(client_for(&server), "nobody@x.y".into()).await;
    assert!(matches!(
        failed,
        UiEvent::Auth(AuthUiEvent::ResetEmailFailed { .. })
    ));
}

#[tokio::test]
async fn reset_password_sends_token_and_new_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reset-password"))
        .and(body_json(json!({"token": "R", "new_password": "new-pw"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let event = reset_password(client_for(&server), "R".into(), "new-pw".into()).await;
    assert!(matches!(event, UiEvent::Auth(AuthUiEvent::PasswordReset)));
}

#[tokio::test]
async fn fetch_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snakes"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "snakes": [{"thai_name": "งูเห่า", "binomial": "Naja kaouthia"}]
        })))
        .mount(&server)
        .await;

    let (guard, _store) = guard_with_token(&server, Some("T"));
    match fetch_snakes(guard).await {
        UiEvent::Catalog(CatalogUiEvent::Loaded { snakes }) => {
            assert_eq!(snakes.len(), 1);
            assert_eq!(snakes[0].binomial, "Naja kaouthia");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_fetch_reports_session_lost() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snakes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (guard, store) = guard_with_token(&server, Some("stale"));
    let event = fetch_snakes(guard).await;

    assert!(matches!(
        event,
        UiEvent::Catalog(CatalogUiEvent::SessionLost)
    ));
    assert!(!store.has_session());
}

#[tokio::test]
async fn save_without_session_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (guard, _store) = guard_with_token(&server, None);
    let event = save_snake(guard, FormId(7), None, SnakeRecord::default()).await;
    assert!(matches!(
        event,
        UiEvent::Catalog(CatalogUiEvent::SessionLost)
    ));
}

#[tokio::test]
async fn server_error_on_delete_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/snakes/binomial/Naja%20naja"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (guard, store) = guard_with_token(&server, Some("T"));
    let event = delete_snake(guard, "Naja naja".into()).await;

    assert!(matches!(
        event,
        UiEvent::Catalog(CatalogUiEvent::DeleteFailed { .. })
    ));
    assert!(store.has_session());
}
