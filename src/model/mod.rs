//! Stored record shapes. Field names follow the persisted JSON (camelCase); every
//! record tolerates missing fields so that older or hand-edited data still loads.

mod academics;
mod desk;
mod people;
mod school;
mod transport;

pub use academics::*;
pub use desk::*;
pub use people::*;
pub use school::*;
pub use transport::*;

/// Shown wherever a weak reference does not resolve.
pub const UNRESOLVED: &str = "—";
