//! Sentinel Simulation Core
//!
//! ECS-симуляция мобильного врага на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = decision layer (FSM, spawner, presentation intents)
//! - внешний слой = perception, pathfinding, физика, рендер, аудио
//!
//! Внешний слой общается с ECS через компоненты-фасады (`DetectionModule`,
//! `NavAgent`, `Attacker`, `Animator`, `AmbientSound`) и события
//! (`EnemyEvent` внутрь, `PresentationCue` / `AIStateChanged` наружу).
//! `HeadlessPlugin` подменяет внешний слой для headless прогонов.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod headless;
pub mod logger;
pub mod perception;
pub mod presentation;
pub mod spawner;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AIState, EnemyEvent, EnemyMobile};
pub use config::TuningConfig;
pub use error::{ConfigError, SetupError};
pub use headless::{DetectableTarget, HeadlessPlugin};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use spawner::{EnemyPrefab, EnemySpawner, SpawnerConfig, SpawnerPlugin};

/// Фазы fixed тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Спавн новых врагов + их инициализация
    Spawn,
    /// Обновление perception фасада (cooldowns, позиции целей)
    Perception,
    /// FSM: события → переходы → действия → presentation
    Decision,
    /// Движение (внешний слой или HeadlessPlugin)
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (spawn period считается в тиках)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Spawn,
                    SimulationSet::Perception,
                    SimulationSet::Decision,
                    SimulationSet::Locomotion,
                )
                    .chain(),
            )
            .register_type::<AIState>()
            .register_type::<EnemySpawner>()
            .register_type::<spawner::SpawnedBy>()
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, SpawnerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// SimulationPlugin уже добавлен; seed перекрывает дефолтный RNG.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Прогоняет `ticks` fixed тиков без real-time accumulator
///
/// Один вызов FixedUpdate = один тик симуляции (детерминизм не зависит от wall clock).
/// После каждого тика события сдвигаются, как это делает `app.update()`.
pub fn run_fixed_ticks(app: &mut App, ticks: u32) {
    let Some(timestep) = app
        .world()
        .get_resource::<Time<Fixed>>()
        .map(|time| time.timestep())
    else {
        log_error("run_fixed_ticks: Time<Fixed> resource is missing");
        return;
    };

    for _ in 0..ticks {
        if let Some(mut time) = app.world_mut().get_resource_mut::<Time<Fixed>>() {
            time.advance_by(timestep);
        }
        app.world_mut().run_schedule(FixedUpdate);
        update_simulation_events(app.world_mut());
    }
}

/// Swap double-buffer всех событий симуляции (замена `First` schedule)
///
/// Событие живёт два тика: читатели, которые читают каждый тик, ничего
/// не теряют, а непрочитанные cues не копятся бесконечно.
pub fn update_simulation_events(world: &mut World) {
    update_events::<ai::EnemyEvent>(world);
    update_events::<ai::EnemySetupFailed>(world);
    update_events::<ai::AIStateChanged>(world);
    update_events::<presentation::PresentationCue>(world);
    update_events::<spawner::EnemySpawned>(world);
}

fn update_events<T: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<T>>() {
        events.update();
    }
}

/// Снимок одного врага для сравнения прогонов
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub index: u32,
    pub state: AIState,
    pub translation: Vec3,
}

/// Snapshot всех инициализированных врагов (отсортирован по Entity index)
pub fn enemy_snapshot(world: &mut World) -> Vec<EnemySnapshot> {
    let mut query = world.query::<(Entity, &AIState, &Transform)>();
    let mut snapshot: Vec<EnemySnapshot> = query
        .iter(world)
        .map(|(entity, state, transform)| EnemySnapshot {
            index: entity.index(),
            state: *state,
            translation: transform.translation,
        })
        .collect();

    // Сортируем по Entity ID для детерминизма
    snapshot.sort_by_key(|enemy| enemy.index);
    snapshot
}
