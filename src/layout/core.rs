use std::collections::VecDeque;

use serde::Serialize;
use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::model::{DisplayColor, MountedAsset, Rack, RackId};

const LOG_TARGET: &str = "rackview::layout";

/// One display row of a composed elevation.
///
/// An `Asset` row is a single merged row consuming `span` consecutive
/// U-slots; an `Empty` row consumes exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlotRow {
    Empty,
    Asset {
        asset_id: u64,
        label: String,
        color: DisplayColor,
        /// Row-height multiplier, equal to the asset model's height in U.
        span: u16,
    },
}

impl SlotRow {
    /// Number of U-slots this row consumes.
    pub fn span(&self) -> u16 {
        match self {
            SlotRow::Empty => 1,
            SlotRow::Asset { span, .. } => *span,
        }
    }
}

/// Why an asset was excluded from the rendered elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropReason {
    /// An earlier placement already covers the slots this asset claims.
    Overlap,
    /// The asset's span extends past the top of the rack.
    Overflow,
}

/// Record of an asset excluded during composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedAsset {
    pub asset_id: u64,
    pub start_elevation: u16,
    pub reason: DropReason,
}

/// A composed rack elevation: rows and unit labels ordered top-down, plus
/// the assets that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Elevation {
    pub rack: RackId,
    pub rows: Vec<SlotRow>,
    pub labels: Vec<String>,
    pub dropped: Vec<DroppedAsset>,
}

impl Elevation {
    /// Total number of U-slots the rows account for.
    pub fn covered_units(&self) -> u16 {
        self.rows.iter().map(SlotRow::span).sum()
    }
}

/// Unit-index label column for a rack of the given height, ordered top-down:
/// `["{height}U", ..., "1U"]`.
pub fn unit_labels(height: u16) -> Vec<String> {
    (1..=height).rev().map(|unit| format!("{unit}U")).collect()
}

/// Whether the asset's full span lies within the rack.
fn fits_rack(asset: &MountedAsset, rack: &Rack) -> bool {
    asset.start_elevation as u32 + asset.model.height as u32 <= rack.height as u32 + 1
}

/// Transforms a rack's mounted-asset set into a gapless top-down row
/// sequence spanning every U-slot exactly once.
///
/// Composition is a pure function of its inputs; the logger only carries
/// diagnostics for dirty data and never affects the output.
#[derive(Clone, Default)]
pub struct Compositor {
    logger: Option<Logger>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// Compose the elevation for `rack`.
    ///
    /// `assets` must be sorted ascending by `start_elevation`; callers fetch
    /// them pre-sorted and the sweep relies on that order. Overlapping or
    /// out-of-range placements never fail the call: they are dropped from
    /// the rendering, reported in `Elevation::dropped`, and logged.
    pub fn compose(&self, rack: &Rack, assets: &[MountedAsset]) -> Elevation {
        let mut queue: VecDeque<&MountedAsset> = assets.iter().collect();
        // Built bottom-up with push_front so the final order is top-down.
        let mut rows: VecDeque<SlotRow> = VecDeque::with_capacity(rack.height as usize);
        let mut dropped = Vec::new();

        let mut unit: u16 = 1;
        while unit <= rack.height {
            // Cursor already moved past the head's start: an earlier
            // placement covers it. Drop and re-check the new head.
            while let Some(&head) = queue.front() {
                if head.start_elevation >= unit {
                    break;
                }
                queue.pop_front();
                let reason = if fits_rack(head, rack) {
                    DropReason::Overlap
                } else {
                    DropReason::Overflow
                };
                self.warn_dropped(rack, head, unit, reason);
                dropped.push(DroppedAsset {
                    asset_id: head.id,
                    start_elevation: head.start_elevation,
                    reason,
                });
            }

            match queue.front().copied() {
                Some(head) if head.start_elevation == unit => {
                    if fits_rack(head, rack) {
                        queue.pop_front();
                        rows.push_front(SlotRow::Asset {
                            asset_id: head.id,
                            label: head.label(),
                            color: head.model.color,
                            span: head.model.height,
                        });
                        unit += head.model.height;
                    } else {
                        // Span would poke past the top of the rack: data
                        // error. Render the slot empty and leave the asset
                        // queued; the overlap rule discards it next unit.
                        self.warn_overflow(rack, head, unit);
                        rows.push_front(SlotRow::Empty);
                        unit += 1;
                    }
                }
                _ => {
                    rows.push_front(SlotRow::Empty);
                    unit += 1;
                }
            }
        }

        // Anything still queued starts above the rack entirely.
        for leftover in queue {
            self.warn_dropped(rack, leftover, unit, DropReason::Overflow);
            dropped.push(DroppedAsset {
                asset_id: leftover.id,
                start_elevation: leftover.start_elevation,
                reason: DropReason::Overflow,
            });
        }

        Elevation {
            rack: rack.id,
            rows: rows.into(),
            labels: unit_labels(rack.height),
            dropped,
        }
    }

    fn warn_dropped(&self, rack: &Rack, asset: &MountedAsset, unit: u16, reason: DropReason) {
        self.warn(
            "asset dropped from elevation",
            rack,
            asset,
            unit,
            json!(match reason {
                DropReason::Overlap => "overlap",
                DropReason::Overflow => "overflow",
            }),
        );
    }

    fn warn_overflow(&self, rack: &Rack, asset: &MountedAsset, unit: u16) {
        self.warn(
            "asset span exceeds rack height",
            rack,
            asset,
            unit,
            json!("overflow"),
        );
    }

    fn warn(
        &self,
        message: &str,
        rack: &Rack,
        asset: &MountedAsset,
        unit: u16,
        reason: serde_json::Value,
    ) {
        let Some(logger) = &self.logger else {
            return;
        };
        let event = event_with_fields(
            LogLevel::Warn,
            LOG_TARGET,
            message,
            [
                json_str("rack", rack.id.to_string()),
                json_kv("rack_height", rack.height),
                json_kv("asset_id", asset.id),
                json_kv("start_elevation", asset.start_elevation),
                json_kv("model_height", asset.model.height),
                json_kv("cursor_unit", unit),
                ("reason".to_string(), reason),
            ],
        );
        // Diagnostics must never fail a composition.
        let _ = logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogEvent, LogSink, LoggingResult};
    use crate::model::EquipmentModel;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CaptureSink {
        events: Arc<Mutex<Vec<LogEvent>>>,
    }

    impl LogSink for CaptureSink {
        fn log(&self, event: &LogEvent) -> LoggingResult<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn rack(height: u16) -> Rack {
        Rack::new(RackId::new('A', 1), height)
    }

    fn asset(id: u64, start: u16, height: u16) -> MountedAsset {
        let model = EquipmentModel::new("Acme", "X1", height, DisplayColor::rgb(0x20, 0x60, 0xa0));
        MountedAsset::new(id, start, model)
    }

    fn spans(elevation: &Elevation) -> Vec<u16> {
        elevation.rows.iter().map(SlotRow::span).collect()
    }

    #[test]
    fn empty_rack_is_all_empty_rows() {
        let elevation = Compositor::new().compose(&rack(4), &[]);
        assert_eq!(elevation.rows.len(), 4);
        assert!(elevation.rows.iter().all(|row| *row == SlotRow::Empty));
        assert_eq!(elevation.labels, vec!["4U", "3U", "2U", "1U"]);
        assert_eq!(elevation.covered_units(), 4);
    }

    #[test]
    fn single_asset_at_bottom_renders_merged_row_last() {
        let elevation = Compositor::new().compose(&rack(4), &[asset(1, 1, 2)]);
        assert_eq!(spans(&elevation), vec![1, 1, 2]);
        assert_eq!(elevation.rows[0], SlotRow::Empty);
        assert_eq!(elevation.rows[1], SlotRow::Empty);
        match &elevation.rows[2] {
            SlotRow::Asset { asset_id, span, .. } => {
                assert_eq!(*asset_id, 1);
                assert_eq!(*span, 2);
            }
            other => panic!("expected asset row, got {other:?}"),
        }
        assert!(elevation.dropped.is_empty());
    }

    #[test]
    fn adjacent_assets_fill_rack_exactly() {
        let assets = [asset(1, 1, 2), asset(2, 3, 2)];
        let elevation = Compositor::new().compose(&rack(4), &assets);
        assert_eq!(spans(&elevation), vec![2, 2]);
        match (&elevation.rows[0], &elevation.rows[1]) {
            (
                SlotRow::Asset { asset_id: top, .. },
                SlotRow::Asset { asset_id: bottom, .. },
            ) => {
                assert_eq!(*top, 2);
                assert_eq!(*bottom, 1);
            }
            rows => panic!("expected two asset rows, got {rows:?}"),
        }
        assert_eq!(elevation.covered_units(), 4);
    }

    #[test]
    fn overlapping_asset_is_dropped_with_warning() {
        let sink = CaptureSink::default();
        let compositor = Compositor::with_logger(Logger::new(sink.clone()));
        let assets = [asset(1, 1, 3), asset(2, 2, 1)];
        let elevation = compositor.compose(&rack(4), &assets);

        assert_eq!(spans(&elevation), vec![1, 3]);
        assert_eq!(elevation.dropped.len(), 1);
        assert_eq!(elevation.dropped[0].asset_id, 2);
        assert_eq!(elevation.dropped[0].reason, DropReason::Overlap);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fields.get("asset_id"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn overflowing_asset_degrades_to_empty_rows() {
        let sink = CaptureSink::default();
        let compositor = Compositor::with_logger(Logger::new(sink.clone()));
        let elevation = compositor.compose(&rack(2), &[asset(9, 1, 5)]);

        assert_eq!(spans(&elevation), vec![1, 1]);
        assert!(elevation.rows.iter().all(|row| *row == SlotRow::Empty));
        assert_eq!(elevation.dropped.len(), 1);
        assert_eq!(elevation.dropped[0].reason, DropReason::Overflow);
        // One overflow warning at unit 1, one drop warning at unit 2.
        assert_eq!(sink.events.lock().unwrap().len(), 2);
    }

    #[test]
    fn asset_starting_above_rack_is_reported_as_overflow() {
        let elevation = Compositor::new().compose(&rack(4), &[asset(3, 6, 1)]);
        assert_eq!(elevation.rows.len(), 4);
        assert_eq!(elevation.dropped.len(), 1);
        assert_eq!(elevation.dropped[0].reason, DropReason::Overflow);
    }

    #[test]
    fn coverage_always_matches_rack_height() {
        let cases: &[(u16, Vec<MountedAsset>)] = &[
            (1, vec![]),
            (1, vec![asset(1, 1, 1)]),
            (7, vec![asset(1, 2, 2), asset(2, 4, 1), asset(3, 6, 2)]),
            (10, vec![asset(1, 1, 4), asset(2, 3, 2), asset(3, 9, 4)]),
        ];
        let compositor = Compositor::new();
        for (height, assets) in cases {
            let elevation = compositor.compose(&rack(*height), assets);
            assert_eq!(elevation.covered_units(), *height, "height {height}");
        }
    }

    #[test]
    fn composition_is_deterministic() {
        let assets = [asset(1, 1, 2), asset(2, 2, 3), asset(3, 5, 1)];
        let compositor = Compositor::new();
        let first = compositor.compose(&rack(6), &assets);
        let second = compositor.compose(&rack(6), &assets);
        assert_eq!(first, second);
    }

    #[test]
    fn unit_labels_run_top_down() {
        let labels = unit_labels(4);
        assert_eq!(labels, vec!["4U", "3U", "2U", "1U"]);
        assert!(unit_labels(0).is_empty());
    }

    #[test]
    fn zero_height_rack_yields_empty_elevation() {
        let elevation = Compositor::new().compose(&rack(0), &[asset(1, 1, 1)]);
        assert!(elevation.rows.is_empty());
        assert_eq!(elevation.dropped.len(), 1);
    }
}
