use approx::assert_abs_diff_eq;
use broadside_simulator::ai::behavior::{Behavior, BehaviorState, Transition};
use broadside_simulator::scenario::{check_victory, Status};
use broadside_simulator::ship::ShipHandle;
use broadside_simulator::simulation::{Simulation, PHYSICS_TICK_LENGTH};
use broadside_simulator::target::TeamLocator;
use broadside_simulator::{Config, Error};
use nalgebra::vector;
use test_log::test;

fn duel(distance: f64) -> (Box<Simulation>, ShipHandle, ShipHandle) {
    let mut sim = Simulation::new("test", 0).unwrap();
    let player = sim.spawn_player(vector![0.0, 0.0], 0.0);
    let enemy = sim.spawn_enemy(vector![distance, 0.0], 0.0).unwrap();
    (sim, player, enemy)
}

fn run(sim: &mut Simulation, ticks: u32) {
    for _ in 0..ticks {
        sim.step();
    }
}

#[test]
fn test_attached_agent_patrols() {
    let (sim, _, enemy) = duel(50.0);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Patrol));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 1);
}

#[test]
fn test_spotting_alarms() {
    let (mut sim, _, enemy) = duel(10.0);
    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Alarmed));
    assert_eq!(
        sim.events().transitions,
        vec![(
            enemy,
            Transition {
                from: BehaviorState::Patrol,
                to: BehaviorState::Alarmed
            }
        )]
    );
}

#[test]
fn test_attack_after_alarm_period() {
    let (mut sim, _, enemy) = duel(10.0);
    run(&mut sim, 300);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Alarmed));
    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Attack));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 1);
}

#[test]
fn test_decisions_run_once_per_second() {
    let (mut sim, _, enemy) = duel(10.0);
    let mut decision_ticks = vec![];
    for _ in 0..200 {
        let tick = sim.tick();
        if sim.agent(enemy).unwrap().next_decision_tick() == tick {
            decision_ticks.push(tick);
        }
        sim.step();
    }
    assert_eq!(decision_ticks, vec![0, 60, 120, 180]);
}

#[test]
fn test_wounded_attacker_flees() {
    let (mut sim, _, enemy) = duel(10.0);
    sim.agent_mut(enemy).unwrap().behavior = Behavior::resume(BehaviorState::Attack, 0.0);
    sim.ship_mut(enemy).data_mut().unwrap().health = 15;

    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Flee));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 2);
}

#[test]
fn test_chase_gives_up() {
    let (mut sim, _, enemy) = duel(100.0);
    sim.agent_mut(enemy).unwrap().behavior = Behavior::resume(BehaviorState::Chase, 0.0);

    run(&mut sim, 600);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Chase));
    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Alarmed));
}

#[test]
fn test_attack_and_chase_alternate() {
    let (mut sim, player, enemy) = duel(10.0);
    sim.agent_mut(enemy).unwrap().behavior = Behavior::resume(BehaviorState::Attack, -3.0);
    sim.ship_mut(player).data_mut().unwrap().position = vector![100.0, 0.0];

    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Chase));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 2);
    assert_eq!(
        sim.events().transitions,
        vec![(
            enemy,
            Transition {
                from: BehaviorState::Attack,
                to: BehaviorState::Chase
            }
        )]
    );
    let behavior = sim.agent(enemy).unwrap().behavior;
    assert_abs_diff_eq!(
        behavior.time_in_state(sim.time()),
        PHYSICS_TICK_LENGTH,
        epsilon = 1e-9
    );

    let position = sim.ship(enemy).data().unwrap().position;
    sim.ship_mut(player).data_mut().unwrap().position = position + vector![5.0, 0.0];
    run(&mut sim, 59);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Chase));

    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Attack));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 1);
    assert_eq!(
        sim.events().transitions,
        vec![(
            enemy,
            Transition {
                from: BehaviorState::Chase,
                to: BehaviorState::Attack
            }
        )]
    );
    let behavior = sim.agent(enemy).unwrap().behavior;
    assert_abs_diff_eq!(
        behavior.time_in_state(sim.time()),
        PHYSICS_TICK_LENGTH,
        epsilon = 1e-9
    );
}

#[test]
fn test_lost_target_forces_patrol() {
    let (mut sim, player, enemy) = duel(10.0);
    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Alarmed));

    sim.ship_mut(player).apply_damage(1000);
    sim.step();
    assert!(!sim.ship(player).exists());
    assert_eq!(check_victory(&sim), Status::Victory { team: 1 });

    run(&mut sim, 60);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Patrol));
    assert_eq!(sim.ship(enemy).data().unwrap().sail_level, 1);
    assert!(sim.agent(enemy).unwrap().target.handle().is_none());
}

#[test]
fn test_agent_stops_with_its_ship() {
    let (mut sim, _, enemy) = duel(10.0);
    sim.step();
    sim.ship_mut(enemy).apply_damage(1000);
    sim.step();
    assert_eq!(sim.events().sunk, vec![enemy]);
    assert!(sim.agent(enemy).is_some());

    sim.step();
    assert!(sim.agent(enemy).is_none());
    assert_eq!(check_victory(&sim), Status::Victory { team: 0 });
    run(&mut sim, 120);
}

#[test]
fn test_shots_are_broadsides_in_range() {
    for seed in 0..8 {
        let mut sim = Simulation::new("duel", seed).unwrap();
        let mut last_shot: Option<f64> = None;
        for _ in 0..(90 * 60) {
            sim.step();
            for (_, shot) in sim.events().shots.iter() {
                assert!(shot.alignment.abs() < 0.1, "seed {seed}: {shot:?}");
                assert!(shot.distance <= 10.0, "seed {seed}: {shot:?}");
                if let Some(last) = last_shot {
                    assert!(sim.time() - last > 5.0);
                }
                last_shot = Some(sim.time());
            }
            if sim.status() != Status::Running {
                break;
            }
        }
    }
}

#[test]
fn test_patrol_without_target() {
    let mut sim = Simulation::new("patrol", 3).unwrap();
    let enemy = sim.ships().next().unwrap();
    let start = sim.ship(enemy).data().unwrap().position;

    run(&mut sim, 30 * 60);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Patrol));
    assert_eq!(sim.status(), Status::Running);
    let data = sim.ship(enemy).data().unwrap();
    assert_eq!(data.sail_level, 1);
    assert!((data.position - start).norm() > 1.0);
}

#[test]
fn test_short_sighted_config() {
    let mut config = Config::default();
    config.ai.spot_distance = 5.0;
    let mut sim = Simulation::with_config("test", 0, config).unwrap();
    sim.spawn_player(vector![0.0, 0.0], 0.0);
    let enemy = sim.spawn_enemy(vector![10.0, 0.0], 0.0).unwrap();

    sim.step();
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Patrol));
}

#[test]
fn test_invalid_config() {
    let mut config = Config::default();
    config.ai.decision_interval = 0.0;
    assert!(matches!(
        Simulation::with_config("test", 0, config),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Simulation::new("kraken", 0),
        Err(Error::UnknownScenario(_))
    ));
}

#[test]
fn test_determinism() {
    let run_hash = |seed| {
        let mut sim = Simulation::new("skirmish", seed).unwrap();
        run(&mut sim, 1200);
        sim.hash()
    };
    assert_eq!(run_hash(7), run_hash(7));
    assert_ne!(run_hash(7), run_hash(8));
}

#[test]
fn test_snapshot() {
    let (mut sim, player, enemy) = duel(10.0);
    run(&mut sim, 10);
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.tick, 10);
    assert_eq!(snapshot.ships.len(), 2);

    let id: u64 = enemy.into();
    let ship = snapshot.ships.iter().find(|ship| ship.id == id).unwrap();
    assert_eq!(ship.behavior, Some(BehaviorState::Alarmed));
    assert_eq!(ship.team, 1);

    let id: u64 = player.into();
    let ship = snapshot.ships.iter().find(|ship| ship.id == id).unwrap();
    assert_eq!(ship.behavior, None);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("Alarmed"));
}

#[test]
fn test_custom_locator() {
    let (mut sim, _, enemy) = duel(10.0);
    sim.set_locator(Box::new(TeamLocator { team: 2 }));
    run(&mut sim, 120);
    assert_eq!(sim.behavior(enemy), Some(BehaviorState::Patrol));
    assert!(sim.agent(enemy).unwrap().target.handle().is_none());
}
