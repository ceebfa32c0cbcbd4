//! Runtime execution modes.
//!
//! - `tui`: Full-screen interactive client (optional feature)

#[cfg(feature = "tui")]
pub use snakedex_tui::run_tui;

#[cfg(not(feature = "tui"))]
pub async fn run_tui(
    _config: &snakedex_core::config::Config,
    _store: snakedex_core::store::AppStore,
    _start_route: snakedex_core::routes::Route,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
