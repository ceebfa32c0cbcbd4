use snakedex_core::api::CatalogClient;
use snakedex_core::store::AppStore;

use crate::events::{AuthUiEvent, UiEvent};

/// Logs in and stores the returned token.
///
/// Storing the token publishes a store snapshot, so the reducer sees the
/// session before it sees `LoginSucceeded`.
pub async fn login(
    client: CatalogClient,
    store: AppStore,
    email: String,
    password: String,
) -> UiEvent {
    let result = match client.login(&email, &password).await {
        Ok(token) => store
            .set_session_token(&token)
            .map_err(|e| format!("Failed to save session: {e:#}")),
        Err(e) => Err(e.to_string()),
    };
    UiEvent::Auth(match result {
        Ok(()) => AuthUiEvent::LoginSucceeded,
        Err(error) => AuthUiEvent::LoginFailed { error },
    })
}

pub async fn forgot_password(client: CatalogClient, email: String) -> UiEvent {
    UiEvent::Auth(match client.forgot_password(&email).await {
        Ok(()) => AuthUiEvent::ResetEmailSent,
        Err(e) => AuthUiEvent::ResetEmailFailed {
            error: e.to_string(),
        },
    })
}

pub async fn reset_password(client: CatalogClient, token: String, new_password: String) -> UiEvent {
    UiEvent::Auth(match client.reset_password(&token, &new_password).await {
        Ok(()) => AuthUiEvent::PasswordReset,
        Err(e) => AuthUiEvent::PasswordResetFailed {
            error: e.to_string(),
        },
    })
}
