//! Movement intents and the controllers that produce them
//!
//! A character does not know whether it is driven by a player or by AI. Each
//! tick its [`IntentSource`] looks at the character and its surroundings and
//! returns a [`MovementIntent`], which the character then applies.

use crate::character::Character;
use crate::state::MovementState;
use rand::RngCore;
use spire_core::EntityId;
use spire_physics::PhysicsQuery;
use spire_math::Vec3;

/// Axis values smaller than this count as no input
pub const AXIS_DEADZONE: f32 = 0.1;

/// What a controller wants its character to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// Signed horizontal input in `[-1, 1]`
    pub axis: f32,
    /// Face this way without moving (sign only)
    pub aim: Option<f32>,
    pub jump: bool,
    pub slide: bool,
    /// Trigger pressed this tick
    pub fire: bool,
    /// Trigger held down
    pub fire_held: bool,
    pub reload: bool,
    pub melee: bool,
    /// Request a tower turn at the current corner
    pub turn: bool,
    /// Use the manual teleporter pad underfoot
    pub teleport: bool,
    pub leave_cover: bool,
}

impl MovementIntent {
    /// Intent that only moves along the axis
    pub fn walk(axis: f32) -> Self {
        Self {
            axis: axis.clamp(-1.0, 1.0),
            ..Self::default()
        }
    }

    /// Whether the trigger is involved at all
    pub fn wants_fire(&self) -> bool {
        self.fire || self.fire_held
    }
}

/// What a controller knows about the character it is hunting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: EntityId,
    /// Center of the target's body
    pub position: Vec3,
    pub in_cover: bool,
    pub alive: bool,
}

/// World access handed to controllers
pub struct Senses<'a> {
    pub physics: &'a dyn PhysicsQuery,
    pub target: Option<TargetInfo>,
    pub delta_time: f32,
}

/// Strategy that decides a character's intent each tick
pub trait IntentSource {
    fn decide(&mut self, me: &Character, senses: &Senses<'_>, rng: &mut dyn RngCore) -> MovementIntent;
}

/// Edge-triggered input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Jump,
    Slide,
    Fire,
    Reload,
    Melee,
    Turn,
    Teleport,
}

/// Input pulled by the player controller: an axis, a held trigger and a
/// queue of pressed actions.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    axis: f32,
    fire_held: bool,
    pressed: Vec<InputAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directional axis
    pub fn set_axis(&mut self, axis: f32) {
        self.axis = axis.clamp(-1.0, 1.0);
    }

    pub fn axis(&self) -> f32 {
        self.axis
    }

    /// Set whether the fire button is held
    pub fn set_fire_held(&mut self, held: bool) {
        self.fire_held = held;
    }

    /// Queue a pressed action for the next decision
    pub fn press(&mut self, action: InputAction) {
        self.pressed.push(action);
    }

    /// Actions pressed since the last decision
    pub fn pressed(&self) -> &[InputAction] {
        &self.pressed
    }
}

/// Intent source fed by player input
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    input: InputState,
    last_axis: f32,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }
}

impl IntentSource for PlayerController {
    fn decide(&mut self, me: &Character, _senses: &Senses<'_>, _rng: &mut dyn RngCore) -> MovementIntent {
        let mut intent = MovementIntent::walk(self.input.axis);
        intent.fire_held = self.input.fire_held;

        for action in self.input.pressed.drain(..) {
            match action {
                InputAction::Jump => intent.jump = true,
                InputAction::Slide => intent.slide = true,
                InputAction::Fire => intent.fire = true,
                InputAction::Reload => intent.reload = true,
                InputAction::Melee => intent.melee = true,
                InputAction::Turn => intent.turn = true,
                InputAction::Teleport => intent.teleport = true,
            }
        }

        // A fresh push on the stick breaks cover; the direction held while
        // sliding in does not.
        let pushed = intent.axis.abs() > AXIS_DEADZONE && self.last_axis.abs() <= AXIS_DEADZONE;
        if me.movement_state() == MovementState::Cover && pushed {
            intent.leave_cover = true;
        }
        self.last_axis = intent.axis;

        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CharacterBuilder;
    use rand::rngs::mock::StepRng;
    use spire_physics::BoxWorld;

    #[test]
    fn test_pressed_actions_are_consumed() {
        let me = CharacterBuilder::new(EntityId::new(1, 0)).with_default_hitboxes().build();
        let world = BoxWorld::new();
        let senses = Senses { physics: &world, target: None, delta_time: 0.1 };
        let mut rng = StepRng::new(0, 0);

        let mut player = PlayerController::new();
        player.input_mut().set_axis(2.0);
        player.input_mut().press(InputAction::Jump);
        player.input_mut().press(InputAction::Turn);

        let intent = player.decide(&me, &senses, &mut rng);
        assert_eq!(intent.axis, 1.0);
        assert!(intent.jump && intent.turn);
        assert!(!intent.fire);

        let intent = player.decide(&me, &senses, &mut rng);
        assert!(!intent.jump && !intent.turn);
        assert!(player.input().pressed().is_empty());
    }

    #[test]
    fn test_wants_fire() {
        assert!(!MovementIntent::walk(1.0).wants_fire());
        let held = MovementIntent { fire_held: true, ..MovementIntent::default() };
        assert!(held.wants_fire());
    }
}
