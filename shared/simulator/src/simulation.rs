use crate::ai::behavior::{BehaviorState, Transition};
use crate::ai::{Agent, Perception, Shot};
use crate::cannonball::{self, CannonballData, CannonballHandle};
use crate::config::Config;
use crate::error::Error;
use crate::rng::entity_seed;
use crate::scenario::{self, Scenario, Status};
use crate::ship::{self, ShipAccessor, ShipAccessorMut, ShipData, ShipHandle};
use crate::snapshot::*;
use crate::target::{TargetLocator, TargetSlot, TeamLocator};
use nalgebra::Vector2;
use slotmap::{SecondaryMap, SlotMap};

pub const PHYSICS_TICK_LENGTH: f64 = 1.0 / 60.0;

pub struct Simulation {
    scenario: Option<Box<dyn Scenario>>,
    pub(crate) ships: SlotMap<ShipHandle, ShipData>,
    agents: SecondaryMap<ShipHandle, Agent>,
    pub(crate) cannonballs: SlotMap<CannonballHandle, CannonballData>,
    pub(crate) events: SimEvents,
    locator: Box<dyn TargetLocator>,
    config: Config,
    tick: u32,
    seed: u32,
    paused: bool,
}

impl Simulation {
    pub fn new(scenario_name: &str, seed: u32) -> Result<Box<Simulation>, Error> {
        Self::with_config(scenario_name, seed, Config::default())
    }

    pub fn with_config(
        scenario_name: &str,
        seed: u32,
        config: Config,
    ) -> Result<Box<Simulation>, Error> {
        config.validate()?;
        let mut scenario = scenario::load(scenario_name)?;
        log::info!("scenario {scenario_name} seed {seed}");
        let mut sim = Box::new(Simulation {
            scenario: None,
            ships: SlotMap::with_key(),
            agents: SecondaryMap::new(),
            cannonballs: SlotMap::with_key(),
            events: SimEvents::new(),
            locator: Box::new(TeamLocator::default()),
            config,
            tick: 0,
            seed,
            paused: false,
        });

        scenario.init(&mut sim, seed)?;
        sim.scenario = Some(scenario);

        Ok(sim)
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * PHYSICS_TICK_LENGTH
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> Status {
        match self.scenario.as_ref() {
            Some(scenario) => scenario.status(self),
            None => Status::Running,
        }
    }

    pub fn scenario_name(&self) -> Option<String> {
        self.scenario.as_ref().map(|scenario| scenario.name())
    }

    pub fn ship(self: &Simulation, handle: ShipHandle) -> ShipAccessor {
        ShipAccessor {
            simulation: self,
            handle,
        }
    }

    pub fn ship_mut(self: &mut Simulation, handle: ShipHandle) -> ShipAccessorMut {
        ShipAccessorMut {
            simulation: self,
            handle,
        }
    }

    pub fn ships(&self) -> impl Iterator<Item = ShipHandle> + '_ {
        self.ships.keys()
    }

    pub fn cannonballs(&self) -> impl Iterator<Item = &CannonballData> + '_ {
        self.cannonballs.values()
    }

    pub fn agent(&self, handle: ShipHandle) -> Option<&Agent> {
        self.agents.get(handle)
    }

    pub fn agent_mut(&mut self, handle: ShipHandle) -> Option<&mut Agent> {
        self.agents.get_mut(handle)
    }

    pub fn agents(&self) -> impl Iterator<Item = (ShipHandle, &Agent)> + '_ {
        self.agents.iter()
    }

    pub fn behavior(&self, handle: ShipHandle) -> Option<BehaviorState> {
        self.agent(handle).map(|agent| agent.state())
    }

    /// Puts a controller on an existing ship. Returns false if the ship is
    /// gone.
    pub fn attach_agent(&mut self, handle: ShipHandle) -> Result<bool, Error> {
        if !self.ships.contains_key(handle) {
            return Ok(false);
        }
        let seed = entity_seed(self.seed, handle.into());
        let (now, tick) = (self.time(), self.tick);
        let ai = self.config.ai.clone();
        let agent = Agent::new(now, tick, seed, &ai, &mut self.ship_mut(handle))?;
        self.agents.insert(handle, agent);
        log::debug!("attached agent to ship {:?}", handle);
        Ok(true)
    }

    pub fn spawn_enemy(&mut self, position: Vector2<f64>, heading: f64) -> Result<ShipHandle, Error> {
        let data = ship::enemy(&self.config.ship);
        let handle = ship::create(self, position, heading, data);
        self.attach_agent(handle)?;
        Ok(handle)
    }

    pub fn spawn_player(&mut self, position: Vector2<f64>, heading: f64) -> ShipHandle {
        let data = ship::player(&self.config.ship);
        ship::create(self, position, heading, data)
    }

    pub fn set_locator(&mut self, locator: Box<dyn TargetLocator>) {
        self.locator = locator;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::info!("{} at tick {}", if paused { "paused" } else { "resumed" }, self.tick);
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn step(self: &mut Simulation) {
        if self.paused {
            return;
        }
        self.events.clear();

        self.step_agents();

        let handles: Vec<ShipHandle> = self.ships.keys().collect();
        for handle in handles {
            self.ship_mut(handle).tick();
        }

        cannonball::tick(self);

        let before = self.status();
        if let Some(mut scenario) = self.scenario.take() {
            scenario.tick(self);
            self.scenario = Some(scenario);
        }

        self.tick += 1;

        let after = self.status();
        if before == Status::Running && after != Status::Running {
            log::info!("{:?} at tick {}", after, self.tick);
        }
    }

    fn step_agents(&mut self) {
        let mut agents = std::mem::take(&mut self.agents);
        let config = self.config.ai.clone();
        let handles: Vec<ShipHandle> = agents.keys().collect();

        for handle in handles {
            if !self.ships.contains_key(handle) {
                log::debug!("ship {:?} is gone, stopping its agent", handle);
                agents.remove(handle);
                continue;
            }
            let agent = match agents.get_mut(handle) {
                Some(agent) => agent,
                None => continue,
            };
            let perception = match self.perceive(handle, &mut agent.target) {
                Some(perception) => perception,
                None => continue,
            };

            if agent.decision_due(self.tick) {
                match agent.decide(&perception, &config, &mut self.ship_mut(handle)) {
                    Ok(Some(transition)) => {
                        log::debug!(
                            "ship {:?}: {:?} -> {:?} at {:.2}s",
                            handle,
                            transition.from,
                            transition.to,
                            perception.now
                        );
                        self.events.transitions.push((handle, transition));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!("ship {:?}: {}", handle, e);
                        self.events.errors.push((handle, e));
                    }
                }
            }

            if let Some(shot) = agent.actuate(&perception, &config, &mut self.ship_mut(handle)) {
                self.events.shots.push((handle, shot));
            }
        }

        self.agents = agents;
    }

    fn perceive(&self, handle: ShipHandle, target: &mut TargetSlot) -> Option<Perception> {
        let data = self.ships.get(handle).filter(|data| !data.is_sunk())?;
        Some(Perception {
            now: self.time(),
            position: data.position,
            heading: data.direction(),
            health: data.health,
            canon_range: data.config.canon_range,
            target: target.resolve(self, handle, self.locator.as_ref()),
        })
    }

    pub fn events(&self) -> &SimEvents {
        &self.events
    }

    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;
        let fixedpoint = |v: f64| (v * 1e9) as i64;
        let mut s = DefaultHasher::new();
        for data in self.ships.values() {
            s.write_i64(fixedpoint(data.position.x));
            s.write_i64(fixedpoint(data.position.y));
            s.write_i64(fixedpoint(data.heading));
            s.write_i32(data.health);
            s.write_u8(data.sail_level);
        }
        s.finish()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            tick: self.tick,
            time: self.time(),
            status: self.status(),
            paused: self.paused,
            ships: vec![],
            cannonballs: vec![],
        };

        for (handle, data) in self.ships.iter() {
            snapshot.ships.push(ShipSnapshot {
                id: handle.into(),
                team: data.team,
                position: data.position,
                velocity: data.velocity,
                heading: data.heading,
                sail_level: data.sail_level,
                health: data.health,
                behavior: self.behavior(handle),
            });
        }

        for data in self.cannonballs.values() {
            snapshot.cannonballs.push(CannonballSnapshot {
                owner: data.owner.into(),
                position: data.position,
                velocity: data.velocity,
                ttl: data.ttl,
            });
        }

        snapshot
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub ship: ShipHandle,
    pub shooter: ShipHandle,
    pub damage: i32,
}

/// Everything observable that happened during the last step.
#[derive(Clone, Debug, Default)]
pub struct SimEvents {
    pub transitions: Vec<(ShipHandle, Transition)>,
    pub shots: Vec<(ShipHandle, Shot)>,
    pub hits: Vec<Hit>,
    pub sunk: Vec<ShipHandle>,
    pub errors: Vec<(ShipHandle, Error)>,
}

impl SimEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
        self.shots.clear();
        self.hits.clear();
        self.sunk.clear();
        self.errors.clear();
    }
}
