//! Controlled quantum operations
//!
//! This crate builds gates that act only when control qudits hold given
//! values, checks and compares their control conditions, and rewrites them
//! as sequences of simpler controlled gates that reproduce the same unitary,
//! global phase included. Control qudits may have any dimension.

pub mod config;
pub mod error;
pub mod quantum;

pub use config::DecompositionConfig;
pub use error::{ControlError, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::DecompositionConfig;
    pub use crate::error::{ControlError, Result};
    pub use crate::quantum::prelude::*;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
