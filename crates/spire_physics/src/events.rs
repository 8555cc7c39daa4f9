//! Contact events pushed into characters

use spire_core::EntityId;
use spire_math::Vec3;

/// What a trigger zone does to a character standing in it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneKind {
    /// Cover volume entered by sliding
    Cover,
    /// Teleporter pad. Automatic pads fire on entry, manual ones on request.
    Teleporter { destination: Vec3, automatic: bool },
    /// Tower corner, indexed NE=0, SE=1, SW=2, NW=3
    TowerCorner(u8),
}

/// Zone payload carried by enter/stay/exit events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneContact {
    /// The zone entity
    pub zone: EntityId,
    /// Zone behavior
    pub kind: ZoneKind,
    /// World-space zone center
    pub center: Vec3,
}

/// An event the physics side delivers to one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Character started overlapping a zone
    ZoneEnter(ZoneContact),
    /// Character is still inside a zone
    ZoneStay(ZoneContact),
    /// Character stopped overlapping a zone
    ZoneExit(ZoneContact),
    /// Another character bumped into this one
    CharacterHit {
        other: EntityId,
        other_sliding: bool,
    },
}

impl ContactEvent {
    /// Zone payload, if this is a zone event
    pub fn zone(&self) -> Option<&ZoneContact> {
        match self {
            Self::ZoneEnter(c) | Self::ZoneStay(c) | Self::ZoneExit(c) => Some(c),
            Self::CharacterHit { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_payload() {
        let contact = ZoneContact {
            zone: EntityId::new(3, 0),
            kind: ZoneKind::Cover,
            center: Vec3::ZERO,
        };
        assert_eq!(ContactEvent::ZoneExit(contact).zone(), Some(&contact));
        let hit = ContactEvent::CharacterHit { other: EntityId::new(1, 0), other_sliding: true };
        assert!(hit.zone().is_none());
    }
}
