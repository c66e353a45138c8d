use crate::config::AiConfig;
use crate::schedule::Deadline;
use crate::ship::ShipCommands;
use nalgebra::{vector, Vector2};

/// Alignment goal for heading toward the desired direction.
pub const FACE_TOWARD: f64 = 1.0;
/// Alignment goal for presenting a broadside to the desired direction.
pub const FACE_BROADSIDE: f64 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    pub fn input(self) -> f64 {
        match self {
            Turn::Left => -1.0,
            Turn::Right => 1.0,
        }
    }

    /// Chooses the turn that brings `heading` round to `desired`.
    pub fn toward(heading: Vector2<f64>, desired: Vector2<f64>) -> Turn {
        if heading.perp(&desired) < 0.0 {
            Turn::Right
        } else {
            Turn::Left
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SteeringPhase {
    Idle,
    /// A new direction was set and no turn has been chosen yet.
    Pending,
    Turning(Turn),
    /// Aligned; the rudder is centered once the delay expires.
    Settling { until: f64 },
}

/// Converges the ship's heading on a desired direction by issuing turn
/// commands. The turn direction is chosen once per direction change.
#[derive(Clone, Debug)]
pub struct Steering {
    desired: Vector2<f64>,
    expected_alignment: f64,
    phase: SteeringPhase,
    refresh: Deadline,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            desired: vector![0.0, 1.0],
            expected_alignment: FACE_TOWARD,
            phase: SteeringPhase::Idle,
            refresh: Deadline::now(),
        }
    }
}

impl Steering {
    pub fn desired(&self) -> Vector2<f64> {
        self.desired
    }

    pub fn expected_alignment(&self) -> f64 {
        self.expected_alignment
    }

    pub fn phase(&self) -> SteeringPhase {
        self.phase
    }

    pub fn refresh_due(&self, now: f64) -> bool {
        self.refresh.is_due(now)
    }

    pub fn schedule_refresh(&mut self, at: f64) {
        self.refresh.rearm(at);
    }

    /// Starts a new convergence attempt. A zero vector is ignored and
    /// returns false.
    pub fn set_direction(&mut self, direction: Vector2<f64>) -> bool {
        match direction.try_normalize(1e-9) {
            Some(desired) => {
                self.desired = desired;
                self.phase = SteeringPhase::Pending;
                true
            }
            None => false,
        }
    }

    pub fn face_toward(&mut self) {
        self.expected_alignment = FACE_TOWARD;
    }

    pub fn face_broadside(&mut self) {
        self.expected_alignment = FACE_BROADSIDE;
    }

    pub fn alignment(&self, heading: Vector2<f64>) -> f64 {
        heading.dot(&self.desired)
    }

    pub fn is_aligned(&self, heading: Vector2<f64>, precision: f64) -> bool {
        (self.expected_alignment - self.alignment(heading)).abs() < precision
    }

    /// Per-tick convergence step. `heading` is the unit direction of travel.
    pub fn update(
        &mut self,
        now: f64,
        heading: Vector2<f64>,
        config: &AiConfig,
        ship: &mut dyn ShipCommands,
    ) {
        match self.phase {
            SteeringPhase::Idle => {}
            SteeringPhase::Pending | SteeringPhase::Turning(_) => {
                if self.is_aligned(heading, config.direction_precision) {
                    self.phase = SteeringPhase::Settling {
                        until: now + config.settle_delay,
                    };
                } else if self.phase == SteeringPhase::Pending {
                    let turn = Turn::toward(heading, self.desired);
                    ship.set_turn_input(turn.input());
                    self.phase = SteeringPhase::Turning(turn);
                }
            }
            SteeringPhase::Settling { until } => {
                if Deadline::at(until).is_due(now) {
                    ship.set_turn_input(0.0);
                    self.phase = SteeringPhase::Idle;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_turn_choice() {
        let north = vector![0.0, 1.0];
        assert_eq!(Turn::toward(north, vector![1.0, 0.0]), Turn::Right);
        assert_eq!(Turn::toward(north, vector![-1.0, 0.0]), Turn::Left);
        // Directly astern has no preference and turns left.
        assert_eq!(Turn::toward(north, vector![0.0, -1.0]), Turn::Left);
    }

    #[test]
    fn test_zero_direction_is_ignored() {
        let mut steering = Steering::default();
        assert!(steering.set_direction(vector![3.0, 4.0]));
        assert_abs_diff_eq!(steering.desired(), vector![0.6, 0.8], epsilon = 1e-12);
        assert!(!steering.set_direction(vector![0.0, 0.0]));
        assert_abs_diff_eq!(steering.desired(), vector![0.6, 0.8], epsilon = 1e-12);
    }
}
