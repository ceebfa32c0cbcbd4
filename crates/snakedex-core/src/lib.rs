//! Snakedex core: configuration, persistent session/theme store, catalog API
//! client and the session interceptor shared by the TUI and the CLI.

pub mod api;
pub mod config;
pub mod logging;
pub mod routes;
pub mod session;
pub mod store;

pub use snakedex_types as types;
