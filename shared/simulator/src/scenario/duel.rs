use super::prelude::*;

pub const DUEL_DISTANCE: f64 = 10.0;

/// A becalmed player at the origin and one enemy within sight.
#[derive(Default)]
pub struct Duel {}

impl Duel {
    pub fn new() -> Self {
        Self {}
    }
}

impl Scenario for Duel {
    fn name(&self) -> String {
        "duel".into()
    }

    fn human_name(&self) -> String {
        "Duel".into()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32) -> Result<(), Error> {
        let mut rng = new_rng(seed);
        let bearing = UnitComplex::new(rng.gen_range(0.0..TAU));

        sim.spawn_player(vector![0.0, 0.0], 0.0);
        sim.spawn_enemy(bearing * vector![DUEL_DISTANCE, 0.0], rng.gen_range(0.0..TAU))?;
        Ok(())
    }

    fn status(&self, sim: &Simulation) -> Status {
        check_victory(sim)
    }
}
