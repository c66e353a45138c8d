use crate::ai::behavior::BehaviorState;
use crate::scenario::Status;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Snapshot {
    pub tick: u32,
    pub time: f64,
    pub status: Status,
    pub paused: bool,
    pub ships: Vec<ShipSnapshot>,
    pub cannonballs: Vec<CannonballSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShipSnapshot {
    pub id: u64,
    pub team: i32,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub heading: f64,
    pub sail_level: u8,
    pub health: i32,
    /// None for ships without an agent.
    pub behavior: Option<BehaviorState>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CannonballSnapshot {
    pub owner: u64,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub ttl: f64,
}
