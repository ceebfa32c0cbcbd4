//! Shared record types for the snake catalog.
//!
//! Leaf crate: no I/O, no async. Everything here is plain data plus the
//! pure operations the form layer and the API client agree on.

pub mod list_field;
pub mod record;
pub mod wire;

pub use list_field::{ListField, normalize_list_value};
pub use record::{
    DangerLevel, IdentificationStatus, ListKind, RequiredField, SnakeList, SnakeRecord,
};
