use crate::ship::ShipHandle;
use crate::simulation::{Hit, Simulation, PHYSICS_TICK_LENGTH};
use nalgebra::Vector2;
use slotmap::new_key_type;

new_key_type! {
    pub struct CannonballHandle;
}

#[derive(Debug, Clone)]
pub struct CannonballData {
    pub owner: ShipHandle,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub damage: i32,
    /// Seconds until the ball falls into the sea.
    pub ttl: f64,
}

pub fn create(sim: &mut Simulation, data: CannonballData) -> CannonballHandle {
    sim.cannonballs.insert(data)
}

pub fn destroy(sim: &mut Simulation, handle: CannonballHandle) {
    sim.cannonballs.remove(handle);
}

pub fn tick(sim: &mut Simulation) {
    let dt = PHYSICS_TICK_LENGTH;
    let handles: Vec<CannonballHandle> = sim.cannonballs.keys().collect();
    for handle in handles {
        let (owner, position, damage) = {
            let data = match sim.cannonballs.get_mut(handle) {
                Some(data) => data,
                None => continue,
            };
            data.ttl -= dt;
            if data.ttl <= 0.0 {
                destroy(sim, handle);
                continue;
            }
            data.position += data.velocity * dt;
            (data.owner, data.position, data.damage)
        };

        let victim = sim.ships.iter().find_map(|(ship, data)| {
            let struck = ship != owner
                && !data.is_sunk()
                && (data.position - position).norm() <= data.config.hit_radius;
            struck.then_some(ship)
        });

        if let Some(ship) = victim {
            sim.ship_mut(ship).apply_damage(damage);
            log::debug!("cannonball from {:?} hit {:?} for {}", owner, ship, damage);
            sim.events.hits.push(Hit {
                ship,
                shooter: owner,
                damage,
            });
            destroy(sim, handle);
        }
    }
}
