use std::collections::{HashMap, HashSet};

use blake3::Hash;

use crate::error::Result;
use crate::layout::{Compositor, Elevation, SlotRow};
use crate::metrics::LayoutMetrics;
use crate::model::{MountedAsset, Rack, RackId};

#[derive(Debug, Clone)]
struct CachedElevation {
    hash: Hash,
    elevation: Elevation,
}

/// Memoized elevations keyed by rack id.
///
/// Composition is deterministic in `(rack, asset list)`, so the registry
/// hashes the serialized asset list and only recomposes when the content
/// actually changed. Racks whose elevation changed since the last drain are
/// tracked as dirty for the rendering side.
#[derive(Default)]
pub struct ElevationRegistry {
    entries: HashMap<RackId, CachedElevation>,
    dirty: HashSet<RackId>,
    metrics: LayoutMetrics,
}

impl ElevationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the cached elevation for `rack` from a freshly fetched asset
    /// list, recomposing only when the list's content hash changed.
    pub fn sync(
        &mut self,
        rack: &Rack,
        assets: &[MountedAsset],
        compositor: &Compositor,
    ) -> Result<&Elevation> {
        let new_hash = hash_assets(rack, assets)?;

        let stale = match self.entries.get(&rack.id) {
            Some(cached) => cached.hash != new_hash,
            None => true,
        };

        if stale {
            let elevation = compositor.compose(rack, assets);
            let empty = elevation
                .rows
                .iter()
                .filter(|row| matches!(row, SlotRow::Empty))
                .count();
            self.metrics.record_composition(
                assets.len() - elevation.dropped.len(),
                elevation.dropped.len(),
                empty,
            );
            self.entries.insert(
                rack.id,
                CachedElevation {
                    hash: new_hash,
                    elevation,
                },
            );
            self.dirty.insert(rack.id);
        } else {
            self.metrics.record_cache_hit();
        }

        Ok(&self.entries[&rack.id].elevation)
    }

    pub fn elevation_of(&self, rack_id: &RackId) -> Option<&Elevation> {
        self.entries.get(rack_id).map(|cached| &cached.elevation)
    }

    /// Drop cached racks absent from the current inventory.
    pub fn retain(&mut self, present: &HashSet<RackId>) {
        self.entries.retain(|id, _| present.contains(id));
        self.dirty.retain(|id| present.contains(id));
    }

    /// Drain rack ids whose elevation changed since the last drain, paired
    /// with their current elevations.
    pub fn take_dirty(&mut self) -> Vec<(RackId, Elevation)> {
        let mut ids: Vec<_> = self.dirty.drain().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| {
                self.entries
                    .get(&id)
                    .map(|cached| (id, cached.elevation.clone()))
            })
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }
}

fn hash_assets(rack: &Rack, assets: &[MountedAsset]) -> Result<Hash> {
    // Rack height participates in the key: resizing a rack re-lays it out
    // even when the asset list is unchanged.
    let encoded = serde_json::to_vec(&(rack.height, assets))?;
    Ok(blake3::hash(&encoded))
}
