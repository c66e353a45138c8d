use super::prelude::*;

/// A lone enemy with nobody to find.
#[derive(Default)]
pub struct Patrol {}

impl Patrol {
    pub fn new() -> Self {
        Self {}
    }
}

impl Scenario for Patrol {
    fn name(&self) -> String {
        "patrol".into()
    }

    fn human_name(&self) -> String {
        "Patrol".into()
    }

    fn init(&mut self, sim: &mut Simulation, seed: u32) -> Result<(), Error> {
        let mut rng = new_rng(seed);
        sim.spawn_enemy(vector![0.0, 0.0], rng.gen_range(0.0..TAU))?;
        Ok(())
    }
}
