//! Тесты детерминизма
//!
//! Одинаковый seed → идентичные состояния, позиции и выбор случайных эффектов.

use bevy::prelude::*;
use sentinel_simulation::ai::AttackVoice;
use sentinel_simulation::perception::NavAgent;
use sentinel_simulation::presentation::{EffectHandle, PresentationCue, SoundClip};
use sentinel_simulation::{
    create_headless_app, enemy_snapshot, run_fixed_ticks, DetectableTarget, EnemyEvent,
    EnemyMobile, EnemyPrefab, EnemySnapshot, EnemySpawner, HeadlessPlugin, SpawnerConfig,
};

const TICK_COUNT: u32 = 600;

fn prefab() -> EnemyPrefab {
    EnemyPrefab {
        enemy: EnemyMobile {
            random_hit_sparks: (0..8).map(EffectHandle).collect(),
            on_attack_voices: (0..4).map(SoundClip).collect(),
            ..Default::default()
        },
        patrol_nodes: vec![[0.0, 0.0, 0.0], [8.0, 0.0, 0.0], [8.0, 0.0, 8.0]],
        ..Default::default()
    }
}

/// Один прогон: spawner + движущаяся цель + периодический урон всем врагам
fn run_simulation(seed: u64) -> (Vec<EnemySnapshot>, Vec<Option<usize>>, Vec<EffectHandle>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(HeadlessPlugin);

    app.world_mut().spawn((
        Transform::default(),
        EnemySpawner::new(SpawnerConfig {
            max_spawn_count: 4,
            spawn_period_ticks: 25,
        }),
        prefab(),
    ));

    app.world_mut().spawn((
        Transform::from_xyz(30.0, 0.0, 0.0),
        DetectableTarget,
        NavAgent {
            destination: Some(Vec3::new(-10.0, 0.0, 4.0)),
            max_speed: 1.5,
            ..Default::default()
        },
    ));

    let mut sparks = Vec::new();
    for tick in 0..TICK_COUNT {
        if tick % 50 == 0 {
            let world = app.world_mut();
            let mut query = world.query_filtered::<Entity, With<AttackVoice>>();
            let mut enemies: Vec<Entity> = query.iter(world).collect();
            enemies.sort_by_key(|entity| entity.index());
            for enemy in enemies {
                world.send_event(EnemyEvent::Damaged { enemy });
            }
        }

        run_fixed_ticks(&mut app, 1);

        sparks.extend(
            app.world_mut()
                .resource_mut::<Events<PresentationCue>>()
                .drain()
                .filter_map(|cue| match cue {
                    PresentationCue::PlayEffect { effect, .. } => Some(effect),
                    _ => None,
                }),
        );
    }

    let world = app.world_mut();
    let mut voices_query = world.query::<(Entity, &AttackVoice)>();
    let mut voices: Vec<(u32, Option<usize>)> = voices_query
        .iter(world)
        .map(|(entity, voice)| (entity.index(), voice.0))
        .collect();
    voices.sort_by_key(|(index, _)| *index);

    (
        enemy_snapshot(world),
        voices.into_iter().map(|(_, voice)| voice).collect(),
        sparks,
    )
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED);
    let second = run_simulation(SEED);

    assert_eq!(first.0.len(), 4, "все враги заспавнены и инициализированы");
    assert!(!first.2.is_empty(), "урон должен был выбрать hit sparks");
    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let runs: Vec<_> = (0..3).map(|_| run_simulation(SEED)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} дал результат отличный от прогона 0", i);
    }
}
