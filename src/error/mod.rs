//! Error module orchestrator.

mod types;

pub use types::{RackError, Result};
