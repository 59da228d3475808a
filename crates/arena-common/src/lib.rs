//! Common types and errors shared by the Arena execution and verdict crates.

pub mod error;
pub mod types;

pub use error::{ArenaError, ArenaResult};
pub use types::*;
