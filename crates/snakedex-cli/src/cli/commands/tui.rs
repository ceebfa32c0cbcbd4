//! Interactive client launcher.

use anyhow::{Context, Result};
use snakedex_core::config::Config;
use snakedex_core::routes::Route;

use super::open_store;
use crate::modes;

pub async fn run(config: &Config, route: &str) -> Result<()> {
    let start_route = Route::parse(route)?;
    let store = open_store()?;
    modes::run_tui(config, store, start_route)
        .await
        .context("interactive client failed")
}
