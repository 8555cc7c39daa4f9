//! Characters owned by the world and the controllers that drive them

use spire_ai::NpcController;
use spire_character::{Character, IntentSource, PlayerController};
use spire_combat::{DamageInfo, DamageReceiver, HitTarget};
use spire_core::EntityId;
use std::collections::BTreeMap;

/// Every character in the world, iterated in id order
#[derive(Default)]
pub struct Roster {
    characters: BTreeMap<EntityId, Character>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, character: Character) {
        self.characters.insert(character.id(), character);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Character> {
        self.characters.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Character)> {
        self.characters.iter().map(|(id, c)| (*id, c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Character)> {
        self.characters.iter_mut().map(|(id, c)| (*id, c))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl DamageReceiver for Roster {
    fn apply_hit(&mut self, target: HitTarget, damage: &DamageInfo) -> bool {
        match self.characters.get_mut(&target.owner) {
            Some(character) => character.receive_hit(target.hitbox, damage),
            None => false,
        }
    }
}

/// Who decides a character's intent
pub enum Controller {
    Player(PlayerController),
    Npc(Box<NpcController>),
}

impl Controller {
    pub fn source(&mut self) -> &mut dyn IntentSource {
        match self {
            Self::Player(player) => player,
            Self::Npc(npc) => npc.as_mut(),
        }
    }

    pub fn as_npc(&self) -> Option<&NpcController> {
        match self {
            Self::Npc(npc) => Some(npc),
            Self::Player(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerController> {
        match self {
            Self::Player(player) => Some(player),
            Self::Npc(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_character::CharacterBuilder;
    use spire_combat::{Allegiance, DamageType};

    #[test]
    fn test_hits_route_to_the_owner() {
        let mut roster = Roster::new();
        let id = EntityId::new(3, 0);
        roster.insert(
            CharacterBuilder::new(id)
                .with_allegiance(Allegiance::Enemy)
                .with_default_hitboxes()
                .build(),
        );

        let shot = DamageInfo::new(10.0, DamageType::Projectile).with_allegiance(Allegiance::Friendly);
        assert!(roster.apply_hit(HitTarget { owner: id, hitbox: 0 }, &shot));
        assert_eq!(roster.get(id).map(|c| c.health().current), Some(90.0));

        // Unknown owners and hitboxes are ignored
        assert!(!roster.apply_hit(HitTarget { owner: EntityId::new(9, 0), hitbox: 0 }, &shot));
        assert!(!roster.apply_hit(HitTarget { owner: id, hitbox: 7 }, &shot));
    }
}
