//! # Data Models
//!
//! Locally owned entities persisted by the repository layer.

pub mod load;

pub use load::{Load, LoadStatus, NewLoad, StatusCode};
