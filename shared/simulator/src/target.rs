//! Finding and tracking the ship an agent is hunting.
//!
//! Agents never hold a strong reference to their target. A [`TargetSlot`]
//! remembers a handle and re-resolves it through a [`TargetLocator`] whenever
//! the handle goes stale, so a sunk or despawned target simply reads as
//! missing.

use crate::ship::{ShipHandle, PLAYER_TEAM};
use crate::simulation::Simulation;
use nalgebra::Vector2;

pub trait TargetLocator {
    fn locate(&self, sim: &Simulation, seeker: ShipHandle) -> Option<ShipHandle>;
}

/// Finds a live ship on a given team. The default hunts the player.
#[derive(Clone, Copy, Debug)]
pub struct TeamLocator {
    pub team: i32,
}

impl Default for TeamLocator {
    fn default() -> Self {
        Self { team: PLAYER_TEAM }
    }
}

impl TargetLocator for TeamLocator {
    fn locate(&self, sim: &Simulation, seeker: ShipHandle) -> Option<ShipHandle> {
        sim.ships()
            .filter(|&handle| handle != seeker)
            .find(|&handle| {
                let ship = sim.ship(handle);
                ship.is_alive() && ship.data().map(|data| data.team) == Some(self.team)
            })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TargetSlot {
    handle: Option<ShipHandle>,
}

impl TargetSlot {
    pub fn handle(&self) -> Option<ShipHandle> {
        self.handle
    }

    pub fn resolve(
        &mut self,
        sim: &Simulation,
        seeker: ShipHandle,
        locator: &dyn TargetLocator,
    ) -> Option<TargetInfo> {
        let current = self.handle.filter(|&handle| sim.ship(handle).is_alive());
        let handle = match current {
            Some(handle) => handle,
            None => {
                self.handle = locator.locate(sim, seeker);
                if let Some(handle) = self.handle {
                    log::debug!("ship {:?} now tracking {:?}", seeker, handle);
                }
                self.handle?
            }
        };
        TargetInfo::read(sim, handle)
    }
}

/// What an agent may observe about its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetInfo {
    pub handle: ShipHandle,
    pub position: Vector2<f64>,
    pub is_alive: bool,
    pub can_fire_weapons: bool,
    pub health_points: i32,
}

impl TargetInfo {
    pub fn read(sim: &Simulation, handle: ShipHandle) -> Option<TargetInfo> {
        let ship = sim.ship(handle);
        let data = ship.data()?;
        Some(TargetInfo {
            handle,
            position: data.position,
            is_alive: !data.is_sunk(),
            can_fire_weapons: ship.can_fire(),
            health_points: data.health,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ship;
    use nalgebra::vector;

    #[test]
    fn test_slot_follows_replacement() {
        let mut sim = Simulation::new("test", 0).unwrap();
        let config = sim.config().ship.clone();
        let enemy = ship::create(&mut sim, vector![0.0, 0.0], 0.0, ship::enemy(&config));
        let first = ship::create(&mut sim, vector![5.0, 0.0], 0.0, ship::player(&config));

        let mut slot = TargetSlot::default();
        let locator = TeamLocator::default();
        let info = slot.resolve(&sim, enemy, &locator).unwrap();
        assert_eq!(info.handle, first);
        assert!(info.is_alive);

        sim.ship_mut(first).apply_damage(1000);
        sim.step();
        assert!(!sim.ship(first).exists());
        assert!(slot.resolve(&sim, enemy, &locator).is_none());

        let second = ship::create(&mut sim, vector![0.0, 7.0], 0.0, ship::player(&config));
        let info = slot.resolve(&sim, enemy, &locator).unwrap();
        assert_eq!(info.handle, second);
        assert_eq!(info.position, vector![0.0, 7.0]);
    }
}
