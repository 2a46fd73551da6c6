//! Render module orchestrator.

mod core;

pub use core::{ElevationRenderer, RendererSettings, display_width};
