//! Shared helpers for the TUI.

pub mod input;
pub mod text;

pub use input::apply_text_key;
pub use text::{mask, truncate_start_with_ellipsis, truncate_with_ellipsis};
