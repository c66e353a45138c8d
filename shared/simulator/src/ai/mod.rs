//! Enemy ship controller.
//!
//! An [`Agent`] runs two loops against the ship it is attached to. The
//! decision loop runs on a slow [`Cadence`] and moves the behavior state
//! machine. The actuation loop runs every tick: it refreshes the desired
//! direction when its deadline expires, attempts broadside fire while
//! attacking, and steps the heading controller. Both loops read a
//! [`Perception`] built by the host and speak to the ship only through
//! [`ShipCommands`].

pub mod behavior;
pub mod combat;
pub mod steering;

use crate::config::AiConfig;
use crate::error::Error;
use crate::rng::{new_rng, SeededRng};
use crate::schedule::Cadence;
use crate::ship::{Broadside, ShipCommands};
use crate::simulation::PHYSICS_TICK_LENGTH;
use crate::target::{TargetInfo, TargetSlot};
use behavior::{Behavior, BehaviorState, Sighting, Transition};
use combat::Engagement;
use nalgebra::{UnitComplex, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use steering::Steering;

/// Snapshot of the world as seen by one agent on one tick.
#[derive(Clone, Copy, Debug)]
pub struct Perception {
    pub now: f64,
    pub position: Vector2<f64>,
    /// Unit direction of travel.
    pub heading: Vector2<f64>,
    pub health: i32,
    pub canon_range: f64,
    pub target: Option<TargetInfo>,
}

impl Perception {
    pub fn live_target(&self) -> Option<&TargetInfo> {
        self.target.as_ref().filter(|target| target.is_alive)
    }

    pub fn to_target(&self) -> Option<Vector2<f64>> {
        self.live_target()
            .map(|target| target.position - self.position)
    }

    pub fn sighting(&self, spot_distance: f64) -> Sighting {
        match self.to_target() {
            None => Sighting::Missing,
            Some(offset) if offset.norm() <= spot_distance => Sighting::Visible,
            Some(_) => Sighting::OutOfSight,
        }
    }
}

/// A broadside fired by the actuation loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub side: Broadside,
    /// Dot product of heading and target direction when fired.
    pub alignment: f64,
    pub distance: f64,
}

pub struct Agent {
    pub behavior: Behavior,
    pub steering: Steering,
    pub target: TargetSlot,
    decision: Cadence,
    rng: SeededRng,
}

impl Agent {
    /// Attaches a controller to a ship: enters Patrol, sets its sail level
    /// and schedules the first decision for `tick`.
    pub fn new(
        now: f64,
        tick: u32,
        seed: u32,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Result<Agent, Error> {
        let mut behavior = Behavior::new(now);
        behavior.enter(BehaviorState::Patrol, now, ship)?;
        Ok(Agent {
            behavior,
            steering: Steering::default(),
            target: TargetSlot::default(),
            decision: Cadence::from_seconds(config.decision_interval, PHYSICS_TICK_LENGTH, tick),
            rng: new_rng(seed),
        })
    }

    pub fn state(&self) -> BehaviorState {
        self.behavior.state()
    }

    /// Consumes the decision cadence; true when the decision loop should run
    /// this tick.
    pub fn decision_due(&mut self, tick: u32) -> bool {
        self.decision.ready(tick)
    }

    pub fn next_decision_tick(&self) -> u32 {
        self.decision.next_tick()
    }

    /// Decision loop body.
    pub fn decide(
        &mut self,
        perception: &Perception,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Result<Option<Transition>, Error> {
        let sighting = perception.sighting(config.spot_distance);
        self.behavior.evaluate(
            perception.now,
            sighting,
            perception.health,
            config,
            ship,
        )
    }

    /// Actuation loop body. Returns the broadside fired this tick, if any.
    pub fn actuate(
        &mut self,
        perception: &Perception,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Option<Shot> {
        let now = perception.now;
        let mut shot = None;
        if self.steering.refresh_due(now) {
            shot = self.refresh(perception, config, ship);
        }
        self.steering.update(now, perception.heading, config, ship);
        shot
    }

    fn refresh(
        &mut self,
        perception: &Perception,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Option<Shot> {
        let now = perception.now;
        let state = self.behavior.state();

        if !state.needs_target() {
            let (lo, hi) = config.patrol_refresh;
            let delay = self.rng.gen_range(lo..=hi);
            self.steering.schedule_refresh(now + delay);
            let angle = self.rng.gen_range(0.0..TAU);
            self.steering.face_toward();
            self.steering.set_direction(UnitComplex::new(angle) * perception.heading);
            return None;
        }

        // Retried next tick once the target is back.
        let to_target = perception.to_target()?;

        match state {
            BehaviorState::Flee => {
                self.steering.schedule_refresh(now + config.flee_refresh);
                self.steering.face_toward();
                self.steering.set_direction(-to_target);
                None
            }
            BehaviorState::Chase => {
                self.schedule_pursuit(now, config);
                self.steering.face_toward();
                self.steering.set_direction(to_target);
                None
            }
            BehaviorState::Attack => {
                self.schedule_pursuit(now, config);
                self.attack(perception, to_target, config, ship)
            }
            BehaviorState::Patrol | BehaviorState::Alarmed => None,
        }
    }

    fn schedule_pursuit(&mut self, now: f64, config: &AiConfig) {
        let (lo, hi) = config.pursuit_refresh;
        let delay = self.rng.gen_range(lo..=hi);
        self.steering.schedule_refresh(now + delay);
    }

    fn attack(
        &mut self,
        perception: &Perception,
        to_target: Vector2<f64>,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) -> Option<Shot> {
        if !self.steering.set_direction(to_target) {
            return None;
        }
        let distance = to_target.norm();
        let direction = self.steering.desired();
        let engagement = combat::engage(
            perception.heading,
            direction,
            distance,
            ship.can_fire(),
            perception.canon_range,
            config.broadside_precision(),
        );
        match engagement {
            Engagement::Fire(side) => {
                if ship.fire(side) {
                    let alignment = perception.heading.dot(&direction);
                    log::debug!(
                        "fired {:?} broadside at distance {:.2} alignment {:.3}",
                        side,
                        distance,
                        alignment
                    );
                    return Some(Shot {
                        side,
                        alignment,
                        distance,
                    });
                }
                None
            }
            Engagement::Align => {
                self.steering.face_broadside();
                None
            }
            Engagement::Pursue => {
                self.steering.face_toward();
                None
            }
        }
    }
}
