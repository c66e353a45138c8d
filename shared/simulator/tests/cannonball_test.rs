use broadside_simulator::ship::{self, Broadside};
use broadside_simulator::simulation::Simulation;
use nalgebra::vector;
use test_log::test;

#[test]
fn test_broadside_hits() {
    let mut sim = Simulation::new("test", 0).unwrap();
    let config = sim.config().ship.clone();
    let shooter = ship::create(&mut sim, vector![0.0, 0.0], 0.0, ship::enemy(&config));
    let victim = ship::create(&mut sim, vector![-4.0, 0.0], 0.0, ship::player(&config));
    let bystander = ship::create(&mut sim, vector![4.0, 0.0], 0.0, ship::player(&config));

    assert!(sim.ship_mut(shooter).fire(Broadside::Left));
    let mut hits = vec![];
    for _ in 0..60 {
        sim.step();
        hits.extend(sim.events().hits.iter().cloned());
    }

    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|hit| hit.ship == victim && hit.shooter == shooter));
    assert_eq!(sim.ship(victim).data().unwrap().health, 70);
    assert_eq!(sim.ship(bystander).data().unwrap().health, 100);
    assert_eq!(sim.ship(shooter).data().unwrap().health, 100);
    assert_eq!(sim.cannonballs().count(), 0);
}

#[test]
fn test_out_of_range_misses() {
    let mut sim = Simulation::new("test", 0).unwrap();
    let config = sim.config().ship.clone();
    let shooter = ship::create(&mut sim, vector![0.0, 0.0], 0.0, ship::enemy(&config));
    let victim = ship::create(&mut sim, vector![30.0, 0.0], 0.0, ship::player(&config));

    assert!(sim.ship_mut(shooter).fire_right());
    for _ in 0..180 {
        sim.step();
        assert!(sim.events().hits.is_empty());
    }
    assert_eq!(sim.cannonballs().count(), 0);
    assert_eq!(sim.ship(victim).data().unwrap().health, 100);
}

#[test]
fn test_sinking() {
    let mut sim = Simulation::new("test", 0).unwrap();
    let mut config = sim.config().ship.clone();
    config.fire_cooldown = 0.01;
    let shooter = ship::create(&mut sim, vector![0.0, 0.0], 0.0, ship::enemy(&config));
    let victim = ship::create(&mut sim, vector![3.0, 0.0], 0.0, ship::player(&config));

    let mut sunk = false;
    for _ in 0..600 {
        sim.ship_mut(shooter).fire_right();
        sim.step();
        if sim.events().sunk.contains(&victim) {
            sunk = true;
            break;
        }
    }
    assert!(sunk);
    assert!(!sim.ship(victim).exists());
    assert!(sim.ship(shooter).exists());
}
