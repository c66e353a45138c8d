use super::prelude::*;
use crate::ai::combat::{self, Engagement};
use crate::ship::ENEMY_TEAM;

const ENEMY_COUNT: usize = 3;
const PLAYER_TURN_INPUT: f64 = 0.25;

/// A circling player against three enemies. The player answers with a
/// broadside at the first enemy found abeam and in range.
#[derive(Default)]
pub struct Skirmish {
    player: Option<ShipHandle>,
}

impl Skirmish {
    pub fn new() -> Self {
        Self { player: None }
    }
}

impl Scenario for Skirmish {
    fn name(&self) -> String {
        "skirmish".into()
    }

    fn human_name(&self) -> String {
        "Skirmish".into()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32) -> Result<(), Error> {
        let mut rng = new_rng(seed);

        let player = sim.spawn_player(vector![0.0, 0.0], rng.gen_range(0.0..TAU));
        {
            let mut ship = sim.ship_mut(player);
            ship.set_sail_level(1)?;
            ship.set_turn_input(PLAYER_TURN_INPUT);
        }
        self.player = Some(player);

        for i in 0..ENEMY_COUNT {
            let angle = TAU * i as f64 / ENEMY_COUNT as f64 + rng.gen_range(-0.5..0.5);
            let distance = rng.gen_range(15.0..30.0);
            let position = UnitComplex::new(angle) * vector![distance, 0.0];
            sim.spawn_enemy(position, rng.gen_range(0.0..TAU))?;
        }

        Ok(())
    }

    fn tick(&mut self, sim: &mut Simulation) {
        let player = match self.player {
            Some(player) if sim.ship(player).is_alive() => player,
            _ => return,
        };
        if !sim.ship(player).can_fire() {
            return;
        }
        let me = match sim.ship(player).data() {
            Some(me) => me,
            None => return,
        };
        let precision = sim.config().ai.broadside_precision();

        let bearing = sim.ships().find_map(|handle| {
            let them = sim.ship(handle).data()?;
            if them.team != ENEMY_TEAM || them.is_sunk() {
                return None;
            }
            let offset = them.position - me.position;
            let direction = offset.try_normalize(1e-9)?;
            match combat::engage(
                me.direction(),
                direction,
                offset.norm(),
                true,
                me.config.canon_range,
                precision,
            ) {
                Engagement::Fire(side) => Some((handle, side)),
                _ => None,
            }
        });

        if let Some((enemy, side)) = bearing {
            if sim.ship_mut(player).fire(side) {
                log::debug!("player fired {:?} broadside at {:?}", side, enemy);
            }
        }
    }

    fn status(&self, sim: &Simulation) -> Status {
        check_victory(sim)
    }
}
