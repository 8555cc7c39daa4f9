//! Trigger zones and overlap tracking

use crate::error::{PhysicsError, Result};
use crate::events::{ContactEvent, ZoneContact, ZoneKind};
use spire_core::EntityId;
use spire_math::{Aabb, Quat, Vec3};
use std::collections::BTreeSet;

/// A trigger volume in the level
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneVolume {
    pub id: EntityId,
    pub kind: ZoneKind,
    pub bounds: Aabb,
    pub enabled: bool,
}

impl ZoneVolume {
    /// Create a new zone
    pub fn new(id: EntityId, kind: ZoneKind, bounds: Aabb) -> Self {
        Self {
            id,
            kind,
            bounds,
            enabled: true,
        }
    }

    /// Payload for events about this zone
    pub fn contact(&self) -> ZoneContact {
        ZoneContact {
            zone: self.id,
            kind: self.kind,
            center: self.bounds.center(),
        }
    }

    /// Rotate the zone (and a teleporter destination) around a pivot
    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        self.bounds = self.bounds.rotated_around(pivot, rotation);
        if let ZoneKind::Teleporter { destination, automatic } = self.kind {
            self.kind = ZoneKind::Teleporter {
                destination: pivot + rotation * (destination - pivot),
                automatic,
            };
        }
    }
}

/// Tracks which entities overlap which zones and reports changes
#[derive(Debug, Default)]
pub struct ZoneTracker {
    zones: Vec<ZoneVolume>,
    /// (zone, entity) pairs overlapping after the last update
    overlaps: BTreeSet<(EntityId, EntityId)>,
}

impl ZoneTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone
    pub fn add_zone(&mut self, zone: ZoneVolume) {
        log::debug!("Zone {} added ({:?})", zone.id, zone.kind);
        self.zones.push(zone);
    }

    /// Remove a zone and forget its overlaps
    pub fn remove_zone(&mut self, id: EntityId) -> Result<ZoneVolume> {
        let index = self
            .zones
            .iter()
            .position(|z| z.id == id)
            .ok_or(PhysicsError::ZoneNotFound(id))?;
        self.overlaps.retain(|(zone, _)| *zone != id);
        Ok(self.zones.remove(index))
    }

    /// Get a zone
    pub fn zone(&self, id: EntityId) -> Option<&ZoneVolume> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Get a mutable zone
    pub fn zone_mut(&mut self, id: EntityId) -> Option<&mut ZoneVolume> {
        self.zones.iter_mut().find(|z| z.id == id)
    }

    /// All zones
    pub fn zones(&self) -> &[ZoneVolume] {
        &self.zones
    }

    /// Enable or disable a zone
    pub fn set_enabled(&mut self, id: EntityId, enabled: bool) -> Result<()> {
        let zone = self.zone_mut(id).ok_or(PhysicsError::ZoneNotFound(id))?;
        zone.enabled = enabled;
        Ok(())
    }

    /// Whether `entity` currently overlaps `zone`
    pub fn is_overlapping(&self, zone: EntityId, entity: EntityId) -> bool {
        self.overlaps.contains(&(zone, entity))
    }

    /// Compare entity positions against every zone.
    ///
    /// Returns events in zone order, then entity order. Exits are reported
    /// before enters and stays so a character moving between adjacent zones
    /// leaves the old one first. Entities missing from `entities` are dropped
    /// from tracking without an exit event.
    pub fn update(&mut self, entities: &[(EntityId, Vec3)]) -> Vec<(EntityId, ContactEvent)> {
        let mut exits = Vec::new();
        let mut others = Vec::new();
        let mut still_present = BTreeSet::new();

        for zone in &self.zones {
            let contact = zone.contact();
            for &(entity, position) in entities {
                let inside = zone.enabled && zone.bounds.contains_point(position);
                let was_inside = self.overlaps.contains(&(zone.id, entity));

                match (was_inside, inside) {
                    (false, true) => {
                        log::trace!("{} entered zone {}", entity, zone.id);
                        others.push((entity, ContactEvent::ZoneEnter(contact)));
                        still_present.insert((zone.id, entity));
                    }
                    (true, true) => {
                        others.push((entity, ContactEvent::ZoneStay(contact)));
                        still_present.insert((zone.id, entity));
                    }
                    (true, false) => {
                        log::trace!("{} left zone {}", entity, zone.id);
                        exits.push((entity, ContactEvent::ZoneExit(contact)));
                    }
                    (false, false) => {}
                }
            }
        }

        self.overlaps = still_present;
        exits.extend(others);
        exits
    }
}
