use crate::cannonball::{self, CannonballData};
use crate::config::{ShipConfig, MAX_SAIL_LEVEL, MIN_SAIL_LEVEL};
use crate::error::Error;
use crate::simulation::{Simulation, PHYSICS_TICK_LENGTH};
use nalgebra::{vector, UnitComplex, Vector2};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, Key};
use std::f64::consts::TAU;

new_key_type! {
    pub struct ShipHandle;
}

impl From<ShipHandle> for u64 {
    fn from(handle: ShipHandle) -> u64 {
        handle.data().as_ffi()
    }
}

pub const PLAYER_TEAM: i32 = 0;
pub const ENEMY_TEAM: i32 = 1;

/// Bow direction of a ship with heading zero.
pub const FORWARD: Vector2<f64> = vector![0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Broadside {
    Left,
    Right,
}

impl Broadside {
    /// Direction the canons on this side point for a ship travelling along
    /// `heading`.
    pub fn direction(self, heading: Vector2<f64>) -> Vector2<f64> {
        match self {
            Broadside::Left => vector![-heading.y, heading.x],
            Broadside::Right => vector![heading.y, -heading.x],
        }
    }
}

/// Commands a controller may issue to a ship. The ship is the only thing
/// that mutates its own physical state.
pub trait ShipCommands {
    fn set_sail_level(&mut self, level: u8) -> Result<(), Error>;

    /// -1 turns left, +1 turns right, 0 holds the heading.
    fn set_turn_input(&mut self, input: f64);

    fn fire(&mut self, side: Broadside) -> bool;

    fn can_fire(&self) -> bool;

    fn apply_damage(&mut self, amount: i32);

    fn fire_left(&mut self) -> bool {
        self.fire(Broadside::Left)
    }

    fn fire_right(&mut self) -> bool {
        self.fire(Broadside::Right)
    }
}

#[derive(Debug, Clone)]
pub struct ShipData {
    pub team: i32,
    pub position: Vector2<f64>,
    /// Radians, counterclockwise from [`FORWARD`].
    pub heading: f64,
    /// Unit vector along the heading.
    pub movement: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub sail_level: u8,
    pub turn_input: f64,
    pub health: i32,
    pub last_fire_time: Option<f64>,
    pub config: ShipConfig,
}

impl ShipData {
    pub fn new(team: i32, config: ShipConfig) -> ShipData {
        ShipData {
            team,
            position: vector![0.0, 0.0],
            heading: 0.0,
            movement: FORWARD,
            velocity: vector![0.0, 0.0],
            sail_level: MIN_SAIL_LEVEL,
            turn_input: 0.0,
            health: config.max_health,
            last_fire_time: None,
            config,
        }
    }

    pub fn is_sunk(&self) -> bool {
        self.health <= 0
    }

    pub fn can_fire(&self, now: f64) -> bool {
        match self.last_fire_time {
            Some(t) => now - t > self.config.fire_cooldown,
            None => true,
        }
    }

    /// Unit direction of travel. Falls back to the bow direction when the
    /// ship is becalmed.
    pub fn direction(&self) -> Vector2<f64> {
        self.velocity.try_normalize(1e-9).unwrap_or(self.movement)
    }
}

pub fn player(config: &ShipConfig) -> ShipData {
    ShipData::new(PLAYER_TEAM, config.clone())
}

pub fn enemy(config: &ShipConfig) -> ShipData {
    ShipData::new(ENEMY_TEAM, config.clone())
}

pub fn create(
    sim: &mut Simulation,
    position: Vector2<f64>,
    heading: f64,
    mut data: ShipData,
) -> ShipHandle {
    data.position = position;
    data.heading = heading.rem_euclid(TAU);
    data.movement = UnitComplex::new(data.heading) * FORWARD;
    data.velocity =
        data.movement * (data.sail_level as f64 * data.config.velocity_per_sail_level);
    let team = data.team;
    let handle = sim.ships.insert(data);
    log::debug!("created ship {:?} team {} at {:?}", handle, team, position);
    handle
}

pub struct ShipAccessor<'a> {
    pub(crate) simulation: &'a Simulation,
    pub(crate) handle: ShipHandle,
}

impl<'a> ShipAccessor<'a> {
    pub fn handle(&self) -> ShipHandle {
        self.handle
    }

    pub fn exists(&self) -> bool {
        self.simulation.ships.contains_key(self.handle)
    }

    pub fn is_alive(&self) -> bool {
        self.data().map(|data| !data.is_sunk()).unwrap_or(false)
    }

    pub fn data(&self) -> Option<&'a ShipData> {
        self.simulation.ships.get(self.handle)
    }

    pub fn position(&self) -> Option<Vector2<f64>> {
        self.data().map(|data| data.position)
    }

    pub fn velocity(&self) -> Option<Vector2<f64>> {
        self.data().map(|data| data.velocity)
    }

    pub fn can_fire(&self) -> bool {
        self.data()
            .map(|data| !data.is_sunk() && data.can_fire(self.simulation.time()))
            .unwrap_or(false)
    }
}

pub struct ShipAccessorMut<'a> {
    pub(crate) simulation: &'a mut Simulation,
    pub(crate) handle: ShipHandle,
}

impl<'a> ShipAccessorMut<'a> {
    pub fn readonly(&self) -> ShipAccessor {
        ShipAccessor {
            simulation: self.simulation,
            handle: self.handle,
        }
    }

    pub fn data(&self) -> Option<&ShipData> {
        self.simulation.ships.get(self.handle)
    }

    pub fn data_mut(&mut self) -> Option<&mut ShipData> {
        self.simulation.ships.get_mut(self.handle)
    }

    /// Ships that are gone or sinking ignore commands.
    fn afloat_mut(&mut self) -> Option<&mut ShipData> {
        self.data_mut().filter(|data| !data.is_sunk())
    }

    pub fn set_sail_level(&mut self, level: u8) -> Result<(), Error> {
        if level > MAX_SAIL_LEVEL {
            return Err(Error::SailLevelOutOfRange {
                requested: level,
                max: MAX_SAIL_LEVEL,
            });
        }
        if let Some(data) = self.afloat_mut() {
            data.sail_level = level;
        }
        Ok(())
    }

    pub fn expand_sails(&mut self) {
        if let Some(data) = self.afloat_mut() {
            if data.sail_level < MAX_SAIL_LEVEL {
                data.sail_level += 1;
            }
        }
    }

    pub fn retract_sails(&mut self) {
        if let Some(data) = self.afloat_mut() {
            if data.sail_level > MIN_SAIL_LEVEL {
                data.sail_level -= 1;
            }
        }
    }

    pub fn set_turn_input(&mut self, input: f64) {
        if let Some(data) = self.afloat_mut() {
            data.turn_input = if input.is_finite() {
                input.clamp(-1.0, 1.0)
            } else {
                0.0
            };
        }
    }

    pub fn can_fire(&self) -> bool {
        self.readonly().can_fire()
    }

    pub fn fire(&mut self, side: Broadside) -> bool {
        let now = self.simulation.time();
        let handle = self.handle;
        let volley = {
            let data = match self.afloat_mut() {
                Some(data) => data,
                None => return false,
            };
            if !data.can_fire(now) {
                return false;
            }
            data.last_fire_time = Some(now);
            (data.position, data.movement, data.config.clone())
        };
        let (position, heading, config) = volley;

        let outward = side.direction(heading);
        let velocity = outward * config.cannonball_speed;
        let count = config.canons_per_side;
        for i in 0..count {
            let along = if count > 1 {
                config.hull_length * (i as f64 / (count - 1) as f64 - 0.5)
            } else {
                0.0
            };
            let p = position + heading * along + outward * config.hull_radius;
            cannonball::create(
                self.simulation,
                CannonballData {
                    owner: handle,
                    position: p,
                    velocity,
                    damage: config.cannonball_damage,
                    ttl: config.cannonball_ttl,
                },
            );
        }
        log::debug!("ship {:?} fired {:?} broadside", handle, side);
        true
    }

    pub fn fire_left(&mut self) -> bool {
        self.fire(Broadside::Left)
    }

    pub fn fire_right(&mut self) -> bool {
        self.fire(Broadside::Right)
    }

    pub fn apply_damage(&mut self, amount: i32) {
        if let Some(data) = self.afloat_mut() {
            data.health = (data.health - amount.max(0)).max(0);
        }
    }

    /// Fixed-step update: turning, velocity, position, sinking.
    pub fn tick(&mut self) {
        let data = match self.data_mut() {
            Some(data) => data,
            None => return,
        };

        if data.is_sunk() {
            self.sink();
            return;
        }

        // Only a ship under sail answers the rudder.
        if data.sail_level > 0 {
            let turning_angle = -data.turn_input * data.config.max_turn_rate * PHYSICS_TICK_LENGTH;
            data.heading = (data.heading + turning_angle).rem_euclid(TAU);
            data.movement = UnitComplex::new(data.heading) * FORWARD;
        }

        data.velocity =
            data.movement * (data.sail_level as f64 * data.config.velocity_per_sail_level);
        data.position += data.velocity * PHYSICS_TICK_LENGTH;
    }

    fn sink(&mut self) {
        if let Some(data) = self.simulation.ships.remove(self.handle) {
            log::info!(
                "ship {:?} (team {}) sunk at {:?}",
                self.handle,
                data.team,
                data.position
            );
            self.simulation.events.sunk.push(self.handle);
        }
    }
}

impl ShipCommands for ShipAccessorMut<'_> {
    fn set_sail_level(&mut self, level: u8) -> Result<(), Error> {
        ShipAccessorMut::set_sail_level(self, level)
    }

    fn set_turn_input(&mut self, input: f64) {
        ShipAccessorMut::set_turn_input(self, input)
    }

    fn fire(&mut self, side: Broadside) -> bool {
        ShipAccessorMut::fire(self, side)
    }

    fn can_fire(&self) -> bool {
        ShipAccessorMut::can_fire(self)
    }

    fn apply_damage(&mut self, amount: i32) {
        ShipAccessorMut::apply_damage(self, amount)
    }
}
