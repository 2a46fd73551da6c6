//! Inventory model module orchestrator.
//!
//! Downstream code imports rack and asset types from here while the
//! implementation details live in the private `core` module.

mod core;

pub use core::{DisplayColor, EquipmentModel, MountedAsset, Rack, RackId};
