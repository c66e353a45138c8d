use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub const MAX_SAIL_LEVEL: u8 = 2;
pub const MIN_SAIL_LEVEL: u8 = 0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ship: ShipConfig,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_json(s: &str) -> Result<Config, Error> {
        let config: Config =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.ship.validate()?;
        self.ai.validate()
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), Error> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be positive, got {value}")))
    }
}

fn require_range(name: &str, range: (f64, f64)) -> Result<(), Error> {
    require_positive(name, range.0)?;
    require_positive(name, range.1)?;
    if range.1 < range.0 {
        return Err(Error::Config(format!(
            "{name} range is inverted: {} > {}",
            range.0, range.1
        )));
    }
    Ok(())
}

/// Fixed constants of a ship hull.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub max_health: i32,
    /// Radians per second at full rudder. A full circle takes four seconds.
    pub max_turn_rate: f64,
    pub velocity_per_sail_level: f64,
    pub fire_cooldown: f64,
    pub canon_range: f64,
    pub canons_per_side: u32,
    pub hull_length: f64,
    pub hull_radius: f64,
    pub hit_radius: f64,
    pub cannonball_speed: f64,
    pub cannonball_damage: i32,
    pub cannonball_ttl: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_turn_rate: TAU / 4.0,
            velocity_per_sail_level: 2.0,
            fire_cooldown: 5.0,
            canon_range: 10.0,
            canons_per_side: 3,
            hull_length: 1.6,
            hull_radius: 0.5,
            hit_radius: 1.0,
            cannonball_speed: 10.0,
            cannonball_damage: 10,
            cannonball_ttl: 2.0,
        }
    }
}

impl ShipConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_health <= 0 {
            return Err(Error::Config(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }
        require_positive("max_turn_rate", self.max_turn_rate)?;
        require_positive("velocity_per_sail_level", self.velocity_per_sail_level)?;
        require_positive("fire_cooldown", self.fire_cooldown)?;
        require_positive("canon_range", self.canon_range)?;
        require_positive("hit_radius", self.hit_radius)?;
        require_positive("cannonball_speed", self.cannonball_speed)?;
        require_positive("cannonball_ttl", self.cannonball_ttl)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub spot_distance: f64,
    pub flee_health_threshold: i32,
    pub decision_interval: f64,
    pub time_to_attack: f64,
    pub time_to_patrol: f64,
    pub time_to_stop_chasing: f64,
    /// Tolerance on the alignment dot product. Broadside firing accepts
    /// twice this value.
    pub direction_precision: f64,
    pub settle_delay: f64,
    pub patrol_refresh: (f64, f64),
    pub pursuit_refresh: (f64, f64),
    pub flee_refresh: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            spot_distance: 25.0,
            flee_health_threshold: 20,
            decision_interval: 1.0,
            time_to_attack: 5.0,
            time_to_patrol: 10.0,
            time_to_stop_chasing: 10.0,
            direction_precision: 0.05,
            settle_delay: 0.2,
            patrol_refresh: (0.5, 5.0),
            pursuit_refresh: (0.3, 1.0),
            flee_refresh: 1.0,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("spot_distance", self.spot_distance)?;
        require_positive("decision_interval", self.decision_interval)?;
        require_positive("direction_precision", self.direction_precision)?;
        require_positive("settle_delay", self.settle_delay)?;
        require_range("patrol_refresh", self.patrol_refresh)?;
        require_range("pursuit_refresh", self.pursuit_refresh)?;
        require_positive("flee_refresh", self.flee_refresh)
    }

    pub fn broadside_precision(&self) -> f64 {
        self.direction_precision * 2.0
    }
}
