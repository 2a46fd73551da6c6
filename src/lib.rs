//! Rack elevation layout engine for datacenter inventory views.
//!
//! Given a rack's height in U-slots and the assets mounted in it, the
//! compositor produces a gapless top-down occupancy diagram, dropping and
//! reporting conflicting or out-of-range placements instead of failing.
//! The registry memoizes composed elevations per rack, and the renderer
//! turns them into colored text lines.

pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod render;

pub use error::{RackError, Result};
pub use layout::{Compositor, DropReason, DroppedAsset, Elevation, SlotRow, unit_labels};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    event_with_fields, json_kv, json_str,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use model::{DisplayColor, EquipmentModel, MountedAsset, Rack, RackId};
pub use registry::ElevationRegistry;
pub use render::{ElevationRenderer, RendererSettings, display_width};
