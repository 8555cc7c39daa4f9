//! Finite state machine driven by a context snapshot

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Copy + Eq + Hash + Debug {
    /// Called when entering this state
    fn on_enter(&self) {}
    /// Called when exiting this state
    fn on_exit(&self) {}
}

/// Transition condition
pub type TransitionCondition<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A guarded transition to `to`
pub struct Transition<S, C> {
    pub to: S,
    pub condition: TransitionCondition<C>,
    /// Higher is checked first
    pub priority: i32,
}

impl<S, C> Transition<S, C> {
    pub fn new<F>(to: S, condition: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to,
            condition: Box::new(condition),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn should_transition(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

/// Finite state machine over states `S` evaluated against context `C`.
///
/// At most one transition fires per [`update`](Self::update), so a chain
/// of conditions takes one tick per hop.
pub struct StateMachine<S: State, C> {
    current: S,
    previous: Option<S>,
    transitions: HashMap<S, Vec<Transition<S, C>>>,
    global_transitions: Vec<Transition<S, C>>,
}

impl<S: State, C> StateMachine<S, C> {
    pub fn new(initial: S) -> Self {
        initial.on_enter();
        Self {
            current: initial,
            previous: None,
            transitions: HashMap::new(),
            global_transitions: Vec::new(),
        }
    }

    /// Add a transition out of `from`
    pub fn add_transition<F>(&mut self, from: S, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.add_transition_priority(from, to, condition, 0);
    }

    pub fn add_transition_priority<F>(&mut self, from: S, to: S, condition: F, priority: i32)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let list = self.transitions.entry(from).or_default();
        list.push(Transition::new(to, condition).with_priority(priority));
        // Stable sort keeps insertion order among equal priorities
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Add a transition that may fire from any other state
    pub fn add_global_transition<F>(&mut self, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.global_transitions.push(Transition::new(to, condition));
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Switch state unconditionally
    pub fn force_transition(&mut self, to: S) {
        if to == self.current {
            return;
        }
        log::trace!("FSM {:?} -> {:?}", self.current, to);
        self.current.on_exit();
        self.previous = Some(self.current);
        self.current = to;
        self.current.on_enter();
    }

    /// Evaluate transitions against `context`. Returns the new state if one
    /// fired.
    pub fn update(&mut self, context: &C) -> Option<S> {
        let current = self.current;
        let global = self
            .global_transitions
            .iter()
            .find(|t| t.to != current && t.should_transition(context))
            .map(|t| t.to);

        let next = global.or_else(|| {
            self.transitions
                .get(&current)
                .and_then(|list| list.iter().find(|t| t.should_transition(context)))
                .map(|t| t.to)
        })?;

        self.force_transition(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Guard {
        Idle,
        Alert,
        Chase,
    }

    impl State for Guard {}

    struct Seen {
        noise: bool,
        visible: bool,
        distance: f32,
    }

    fn guard() -> StateMachine<Guard, Seen> {
        let mut fsm = StateMachine::new(Guard::Idle);
        fsm.add_transition(Guard::Idle, Guard::Alert, |c: &Seen| c.noise);
        fsm.add_transition_priority(Guard::Idle, Guard::Chase, |c: &Seen| c.visible, 10);
        fsm.add_transition(Guard::Alert, Guard::Chase, |c: &Seen| c.visible);
        fsm.add_transition(Guard::Chase, Guard::Idle, |c: &Seen| c.distance > 20.0);
        fsm
    }

    #[test]
    fn test_priority_wins_over_insertion_order() {
        let mut fsm = guard();
        let seen = Seen { noise: true, visible: true, distance: 5.0 };
        assert_eq!(fsm.update(&seen), Some(Guard::Chase));
        assert_eq!(fsm.previous(), Some(Guard::Idle));
    }

    #[test]
    fn test_one_hop_per_update() {
        let mut fsm = guard();
        let mut seen = Seen { noise: true, visible: false, distance: 5.0 };
        assert_eq!(fsm.update(&seen), Some(Guard::Alert));
        assert_eq!(fsm.update(&seen), None);

        seen.visible = true;
        assert_eq!(fsm.update(&seen), Some(Guard::Chase));

        seen.distance = 25.0;
        assert_eq!(fsm.update(&seen), Some(Guard::Idle));
    }

    #[test]
    fn test_global_transition_skips_self() {
        let mut fsm = guard();
        fsm.add_global_transition(Guard::Idle, |c: &Seen| c.distance > 50.0);
        let far = Seen { noise: false, visible: false, distance: 60.0 };
        assert_eq!(fsm.update(&far), None);

        fsm.force_transition(Guard::Chase);
        assert_eq!(fsm.update(&far), Some(Guard::Idle));
    }

    #[test]
    fn test_force_transition_to_same_state_is_noop() {
        let mut fsm = guard();
        fsm.force_transition(Guard::Idle);
        assert_eq!(fsm.previous(), None);
        assert!(fsm.is_in(Guard::Idle));
    }
}
