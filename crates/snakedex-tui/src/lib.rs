//! Full-screen TUI for the Snakedex catalog.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use features::{auth, catalog, theme, toast};
pub use runtime::TuiRuntime;
use snakedex_core::config::Config;
use snakedex_core::routes::Route;
use snakedex_core::store::AppStore;

/// Runs the interactive client, starting at `start_route`.
///
/// Must be called from inside a multi-threaded tokio runtime; HTTP calls are
/// spawned onto it while the event loop blocks this thread.
pub async fn run_tui(config: &Config, store: AppStore, start_route: Route) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `snakedex snakes list` for non-interactive access."
        );
    }

    tracing::info!(route = %start_route, "starting tui");
    let mut runtime = TuiRuntime::new(config, store, start_route)?;
    runtime.run()?;
    drop(runtime);

    // Terminal is restored at this point.
    let mut err = stderr();
    writeln!(err, "Goodbye!")?;
    err.flush()?;
    Ok(())
}
