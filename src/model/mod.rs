//! Data model for classified schema changes

pub mod change_entry;
pub mod destination;

pub use change_entry::ChangeEntry;
pub use destination::{Destination, ObjectType};
