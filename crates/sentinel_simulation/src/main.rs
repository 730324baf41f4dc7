//! Headless симуляция Sentinel
//!
//! Spawner + движущаяся цель, 1000 fixed тиков без рендера.
//! Первый аргумент: путь к tuning.toml (по умолчанию ./tuning.toml).

use bevy::prelude::*;
use sentinel_simulation::config::DEFAULT_TUNING_PATH;
use sentinel_simulation::perception::NavAgent;
use sentinel_simulation::{
    create_headless_app, enemy_snapshot, run_fixed_ticks, AIState, DetectableTarget,
    EnemySpawner, HeadlessPlugin, SimulationSet, TuningConfig,
};

/// Цель ходит туда-обратно между двумя точками
#[derive(Component)]
struct ShuttleTarget {
    a: Vec3,
    b: Vec3,
    heading_to_b: bool,
}

fn steer_shuttle_targets(mut targets: Query<(&Transform, &mut ShuttleTarget, &mut NavAgent)>) {
    for (transform, mut shuttle, mut nav) in targets.iter_mut() {
        let goal = if shuttle.heading_to_b { shuttle.b } else { shuttle.a };
        if transform.translation.distance(goal) <= 0.5 {
            shuttle.heading_to_b = !shuttle.heading_to_b;
        }
        nav.destination = Some(if shuttle.heading_to_b { shuttle.b } else { shuttle.a });
    }
}

fn main() {
    let seed = 42;
    let tuning_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TUNING_PATH.to_string());

    println!("Starting Sentinel headless simulation (seed: {})", seed);

    let tuning = TuningConfig::load_or_default(&tuning_path);

    let mut app = create_headless_app(seed);
    app.add_plugins(HeadlessPlugin).add_systems(
        FixedUpdate,
        steer_shuttle_targets.in_set(SimulationSet::Perception),
    );

    app.world_mut().spawn((
        Transform::default(),
        EnemySpawner::new(tuning.spawner),
        tuning.prefab.clone(),
    ));

    app.world_mut().spawn((
        Transform::from_xyz(40.0, 0.0, 0.0),
        DetectableTarget,
        NavAgent {
            max_speed: 2.0,
            ..Default::default()
        },
        ShuttleTarget {
            a: Vec3::new(40.0, 0.0, 0.0),
            b: Vec3::new(-5.0, 0.0, 5.0),
            heading_to_b: true,
        },
    ));

    // Запускаем 1000 тиков симуляции
    for tick in (0..1000).step_by(100) {
        run_fixed_ticks(&mut app, 100);

        let snapshot = enemy_snapshot(app.world_mut());
        let count = |state: AIState| snapshot.iter().filter(|e| e.state == state).count();
        println!(
            "Tick {}: {} enemies (patrol {}, follow {}, attack {})",
            tick + 100,
            snapshot.len(),
            count(AIState::Patrol),
            count(AIState::Follow),
            count(AIState::Attack)
        );
    }

    println!("Simulation complete!");
}
