use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Running counters for elevation composition work.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    compositions: u64,
    cache_hits: u64,
    assets_placed: u64,
    assets_dropped: u64,
    slots_empty: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_composition(&mut self, placed: usize, dropped: usize, empty: usize) {
        self.compositions = self.compositions.saturating_add(1);
        self.assets_placed = self.assets_placed.saturating_add(placed as u64);
        self.assets_dropped = self.assets_dropped.saturating_add(dropped as u64);
        self.slots_empty = self.slots_empty.saturating_add(empty as u64);
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits = self.cache_hits.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            compositions: self.compositions,
            cache_hits: self.cache_hits,
            assets_placed: self.assets_placed,
            assets_dropped: self.assets_dropped,
            slots_empty: self.slots_empty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub compositions: u64,
    pub cache_hits: u64,
    pub assets_placed: u64,
    pub assets_dropped: u64,
    pub slots_empty: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "layout_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("compositions".to_string(), json!(self.compositions));
        map.insert("cache_hits".to_string(), json!(self.cache_hits));
        map.insert("assets_placed".to_string(), json!(self.assets_placed));
        map.insert("assets_dropped".to_string(), json!(self.assets_dropped));
        map.insert("slots_empty".to_string(), json!(self.slots_empty));
        map
    }
}
