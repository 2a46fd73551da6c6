//! Layout module orchestrator.
//!
//! Downstream code imports the occupancy compositor from here while the
//! sweep implementation lives in the private `core` module.

mod core;

pub use core::{Compositor, DropReason, DroppedAsset, Elevation, SlotRow, unit_labels};
