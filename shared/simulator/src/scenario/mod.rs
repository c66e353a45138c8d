mod duel;
mod patrol;
mod skirmish;

use crate::error::Error;
use crate::simulation::Simulation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod prelude {
    pub use super::check_victory;
    pub use super::Scenario;
    pub use super::Status;
    pub use crate::error::Error;
    pub use crate::rng::{new_rng, SeededRng};
    pub use crate::ship::{self, ShipHandle};
    pub use crate::simulation::Simulation;
    pub use nalgebra::{vector, UnitComplex, Vector2};
    pub use rand::Rng;
    pub use std::f64::consts::{PI, TAU};
}

#[derive(PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Copy, Clone)]
pub enum Status {
    Running,
    Victory { team: i32 },
    Draw,
}

pub trait Scenario {
    fn name(&self) -> String;

    fn human_name(&self) -> String {
        self.name()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32) -> Result<(), Error>;

    fn tick(&mut self, _: &mut Simulation) {}

    fn status(&self, _: &Simulation) -> Status {
        Status::Running
    }
}

pub fn load_safe(name: &str) -> Option<Box<dyn Scenario>> {
    let scenario: Option<Box<dyn Scenario>> = match name {
        "test" => Some(Box::new(test::TestScenario {})),
        "patrol" => Some(Box::new(patrol::Patrol::new())),
        "duel" => Some(Box::new(duel::Duel::new())),
        "skirmish" => Some(Box::new(skirmish::Skirmish::new())),
        _ => None,
    };
    if let Some(scenario) = scenario.as_ref() {
        debug_assert_eq!(scenario.name(), name);
    }
    scenario
}

pub fn load(name: &str) -> Result<Box<dyn Scenario>, Error> {
    load_safe(name).ok_or_else(|| Error::UnknownScenario(name.to_string()))
}

pub fn list() -> Vec<String> {
    vec!["patrol", "duel", "skirmish"]
        .iter()
        .map(|x| x.to_string())
        .collect()
}

/// Victory once a single team is afloat, draw when nobody is.
pub fn check_victory(sim: &Simulation) -> Status {
    let mut team_health: HashMap<i32, i32> = HashMap::new();
    for handle in sim.ships() {
        if let Some(data) = sim.ship(handle).data() {
            if !data.is_sunk() {
                *team_health.entry(data.team).or_insert(0) += data.health;
            }
        }
    }
    let mut teams = team_health.keys();
    match (teams.next(), teams.next()) {
        (None, _) => Status::Draw,
        (Some(&team), None) => Status::Victory { team },
        _ => Status::Running,
    }
}
