//! Home page: the catalog list.

mod render;
mod state;
mod update;

pub use render::render_home;
pub use state::CatalogState;
pub use update::{HomeUpdate, handle_catalog_result, handle_home_key, messages};
