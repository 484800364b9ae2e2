//! Domain model for the scheduling store.

pub mod entities;
pub mod kinds;

pub use entities::*;
pub use kinds::*;
