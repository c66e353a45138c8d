use crate::config::AiConfig;
use crate::error::Error;
use crate::schedule::elapsed_at_least;
use crate::ship::ShipCommands;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    Patrol,
    Alarmed,
    Attack,
    Flee,
    Chase,
}

impl BehaviorState {
    /// Sail level set on entering the state.
    pub fn sail_level(self) -> u8 {
        match self {
            BehaviorState::Patrol | BehaviorState::Alarmed | BehaviorState::Attack => 1,
            BehaviorState::Chase | BehaviorState::Flee => 2,
        }
    }

    pub fn needs_target(self) -> bool {
        matches!(
            self,
            BehaviorState::Attack | BehaviorState::Chase | BehaviorState::Flee
        )
    }
}

/// How the target looks from the agent's ship at decision time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sighting {
    /// No target, or the target is sinking.
    Missing,
    OutOfSight,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: BehaviorState,
    pub to: BehaviorState,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Behavior {
    state: BehaviorState,
    changed_at: f64,
}

impl Behavior {
    /// Starts in Patrol. The caller is expected to apply the Patrol sail level.
    pub fn new(now: f64) -> Self {
        Self::resume(BehaviorState::Patrol, now)
    }

    /// Restores a state that was entered at `since` without issuing any
    /// ship commands.
    pub fn resume(state: BehaviorState, since: f64) -> Self {
        Self {
            state,
            changed_at: since,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn time_in_state(&self, now: f64) -> f64 {
        now - self.changed_at
    }

    /// The transition table. Pure: no side effects, no randomness.
    pub fn next_state(
        &self,
        now: f64,
        sighting: Sighting,
        health: i32,
        config: &AiConfig,
    ) -> Option<BehaviorState> {
        use BehaviorState::*;
        let waited = |duration| elapsed_at_least(self.changed_at, now, duration);
        match (sighting, self.state) {
            (Sighting::Missing, Patrol) => None,
            (Sighting::Missing, _) => Some(Patrol),

            (Sighting::Visible, Patrol) => Some(Alarmed),
            (Sighting::Visible, Alarmed) if waited(config.time_to_attack) => Some(Attack),
            (Sighting::Visible, Attack) if health < config.flee_health_threshold => Some(Flee),
            (Sighting::Visible, Chase) => Some(Attack),
            (Sighting::Visible, _) => None,

            (Sighting::OutOfSight, Alarmed) if waited(config.time_to_patrol) => Some(Patrol),
            (Sighting::OutOfSight, Attack) => Some(Chase),
            (Sighting::OutOfSight, Chase) if waited(config.time_to_stop_chasing) => {
                Some(Alarmed)
            }
            (Sighting::OutOfSight, Flee) => Some(Patrol),
            (Sighting::OutOfSight, _) => None,
        }
    }

    /// Records the change and sets the sail level for the new state.
    pub fn enter(
        &mut self,
        state: BehaviorState,
        now: f64,
        ship: &mut dyn ShipCommands,
    ) -> Result<(), Error> {
        self.state = state;
        self.changed_at = now;
        ship.set_sail_level(state.sail_level())
    }

    /// One decision-loop evaluation.
    pub fn evaluate(
        &mut self,
        now: f64,
        sighting: Sighting,
        health: i32,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Result<Option<Transition>, Error> {
        let next = match self.next_state(now, sighting, health, config) {
            Some(next) => next,
            None => return Ok(None),
        };
        let transition = Transition {
            from: self.state,
            to: next,
        };
        self.enter(next, now, ship)?;
        Ok(Some(transition))
    }
}
