//! Repository implementations module.
//!
//! - `local`: In-memory implementation used by the server and the test suite
pub mod local;

pub use local::LocalRepository;
