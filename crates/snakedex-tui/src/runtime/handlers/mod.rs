//! Effect handlers for the TUI runtime.
//!
//! These functions perform the HTTP calls triggered by the reducer. They do
//! NOT mutate UI state; the only shared state they touch is the store.
//!
//! ## Pure Async Pattern
//!
//! Handlers are pure async functions that return `UiEvent`. The runtime uses
//! `spawn_effect` to spawn them and send results to the inbox.
//!
//! ```ignore
//! self.spawn_effect(move || handlers::fetch_snakes(guard));
//! ```

pub mod auth;
pub mod catalog;

pub use auth::*;
pub use catalog::*;

#[cfg(test)]
mod tests;
