//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod snakes;
pub mod theme;
pub mod tui;

use anyhow::{Context, Result};
use snakedex_core::api::CatalogClient;
use snakedex_core::config::Config;
use snakedex_core::session::{SessionError, SessionGuard};
use snakedex_core::store::AppStore;

/// Message for any protected call made without a valid session.
pub const SESSION_EXPIRED: &str = "Session expired. Run `snakedex login`.";

fn open_store() -> Result<AppStore> {
    AppStore::open_default().context("open session store")
}

fn client(config: &Config) -> Result<CatalogClient> {
    CatalogClient::from_config(config).context("create API client")
}

fn guard(config: &Config) -> Result<SessionGuard> {
    Ok(SessionGuard::new(client(config)?, open_store()?))
}

/// Maps a protected-call failure to the user-facing error.
fn session_error(error: SessionError, action: &str) -> anyhow::Error {
    if error.requires_login() {
        anyhow::anyhow!(SESSION_EXPIRED)
    } else {
        anyhow::Error::new(error).context(action.to_string())
    }
}
