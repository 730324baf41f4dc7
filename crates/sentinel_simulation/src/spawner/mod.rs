//! Periodic capped spawner
//!
//! Каждый fixed тик счётчик растёт; на каждом `spawn_period_ticks`-м тике
//! спавнится один враг из `EnemyPrefab`, пока не достигнут `max_spawn_count`.
//! После этого spawner навсегда no-op.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::EnemyMobile;
use crate::combat::Attacker;
use crate::perception::{DetectionModule, NavAgent, PatrolPath};
use crate::presentation::{AmbientSound, Animator};
use crate::SimulationSet;

/// Параметры spawner'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SpawnerConfig {
    pub max_spawn_count: u32,
    /// Тиков между попытками спавна (60Hz → 30 тиков = 0.5 сек)
    pub spawn_period_ticks: u32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            max_spawn_count: 3,
            spawn_period_ticks: 30,
        }
    }
}

/// Spawn point: пара счётчиков + config
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemySpawner {
    pub config: SpawnerConfig,
    /// Тики с последнего спавна (сбрасывается каждые spawn_period_ticks)
    pub tick_counter: u32,
    /// Сколько уже заспавнено (монотонный, ≤ max_spawn_count)
    pub spawned_count: u32,
}

impl EnemySpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self {
            config,
            tick_counter: 0,
            spawned_count: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned_count >= self.config.max_spawn_count
    }

    /// Один fixed тик. true → пора спавнить (spawned_count уже увеличен)
    pub fn tick(&mut self) -> bool {
        if self.is_exhausted() || self.config.spawn_period_ticks == 0 {
            return false;
        }

        self.tick_counter += 1;
        if self.tick_counter < self.config.spawn_period_ticks {
            return false;
        }

        self.tick_counter = 0;
        self.spawned_count += 1;
        true
    }
}

/// Prefab врага: всё что нужно чтобы собрать новую entity
///
/// Векторы хранятся как `[f32; 3]` чтобы tuning.toml не зависел от serde feature bevy.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyPrefab {
    pub enemy: EnemyMobile,
    pub attack_range: f32,
    pub detection_range: f32,
    pub detection_source_height: f32,
    pub max_speed: f32,
    pub orientation_speed: f32,
    pub stopping_distance: f32,
    pub attack_cooldown: f32,
    /// World-space ноды патруля
    pub patrol_nodes: Vec<[f32; 3]>,
    pub patrol_reach_radius: f32,
    /// Смещение врага относительно spawn point (local space)
    pub local_offset: [f32; 3],
}

impl Default for EnemyPrefab {
    fn default() -> Self {
        Self {
            enemy: EnemyMobile::default(),
            attack_range: 10.0,
            detection_range: 20.0,
            detection_source_height: 1.5,
            max_speed: 3.5,
            orientation_speed: 10.0,
            stopping_distance: 0.1,
            attack_cooldown: 1.0,
            patrol_nodes: Vec::new(),
            patrol_reach_radius: 2.0,
            local_offset: [0.0; 3],
        }
    }
}

impl EnemyPrefab {
    /// Bundle нового врага в точке `spawn_point` (с учётом local_offset)
    pub fn build(&self, spawn_point: &Transform) -> impl Bundle {
        let transform =
            spawn_point.mul_transform(Transform::from_translation(Vec3::from(self.local_offset)));

        (
            self.enemy.clone(),
            transform,
            DetectionModule {
                attack_range: self.attack_range,
                detection_range: self.detection_range,
                detection_source_offset: Vec3::Y * self.detection_source_height,
                ..Default::default()
            },
            NavAgent {
                max_speed: self.max_speed,
                orientation_speed: self.orientation_speed,
                stopping_distance: self.stopping_distance,
                ..Default::default()
            },
            PatrolPath::new(
                self.patrol_nodes.iter().copied().map(Vec3::from).collect(),
                self.patrol_reach_radius,
            ),
            Attacker::new(self.attack_cooldown),
            Animator::default(),
            AmbientSound::default(),
        )
    }
}

/// Связь заспавненного врага с его spawn point (только для отладки/статистики)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SpawnedBy(pub Entity);

/// Событие: spawner создал врага
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySpawned {
    pub spawner: Entity,
    pub enemy: Entity,
}

/// Система: тик всех spawner'ов
pub fn tick_enemy_spawners(
    mut commands: Commands,
    mut spawners: Query<(Entity, &mut EnemySpawner, &EnemyPrefab, &Transform)>,
    mut spawned_events: EventWriter<EnemySpawned>,
) {
    for (spawner_entity, mut spawner, prefab, transform) in spawners.iter_mut() {
        if spawner.is_exhausted() {
            continue;
        }

        if !spawner.tick() {
            continue;
        }

        let enemy = commands
            .spawn((prefab.build(transform), SpawnedBy(spawner_entity)))
            .id();
        spawned_events.write(EnemySpawned {
            spawner: spawner_entity,
            enemy,
        });

        crate::log_info(&format!(
            "🐣 Spawner {:?} spawned enemy {:?} ({}/{})",
            spawner_entity, enemy, spawner.spawned_count, spawner.config.max_spawn_count
        ));

        if spawner.is_exhausted() {
            crate::log_info(&format!("Spawner {:?} reached its cap, stopping", spawner_entity));
        }
    }
}

/// Spawner Plugin
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemySpawned>().add_systems(
            FixedUpdate,
            tick_enemy_spawners
                .in_set(SimulationSet::Spawn)
                .before(crate::ai::systems::initialize_enemy_mobiles),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawner_cap_after_150_ticks() {
        let mut spawner = EnemySpawner::new(SpawnerConfig {
            max_spawn_count: 3,
            spawn_period_ticks: 30,
        });

        let spawn_ticks: Vec<u32> = (1..=150).filter(|_| spawner.tick()).collect();

        assert_eq!(spawn_ticks, vec![30, 60, 90]);
        assert_eq!(spawner.spawned_count, 3);
        assert!(spawner.is_exhausted());

        // Тик 151+ — никогда больше
        for _ in 0..1000 {
            assert!(!spawner.tick());
        }
        assert_eq!(spawner.spawned_count, 3);
    }

    #[test]
    fn test_spawner_counter_resets_each_period() {
        let mut spawner = EnemySpawner::new(SpawnerConfig {
            max_spawn_count: 10,
            spawn_period_ticks: 4,
        });

        for _ in 0..3 {
            assert!(!spawner.tick());
        }
        assert_eq!(spawner.tick_counter, 3);

        assert!(spawner.tick());
        assert_eq!(spawner.tick_counter, 0);
        assert_eq!(spawner.spawned_count, 1);
    }

    #[test]
    fn test_spawner_zero_cap_never_spawns() {
        let mut spawner = EnemySpawner::new(SpawnerConfig {
            max_spawn_count: 0,
            spawn_period_ticks: 1,
        });

        assert!(spawner.is_exhausted());
        assert!(!spawner.tick());
        assert_eq!(spawner.tick_counter, 0);
    }

    #[test]
    fn test_spawner_zero_period_is_inert() {
        let mut spawner = EnemySpawner::new(SpawnerConfig {
            max_spawn_count: 5,
            spawn_period_ticks: 0,
        });

        for _ in 0..100 {
            assert!(!spawner.tick());
        }
        assert_eq!(spawner.spawned_count, 0);
    }

    #[test]
    fn test_prefab_build_applies_offset() {
        let prefab = EnemyPrefab {
            local_offset: [1.0, 0.0, 0.0],
            ..Default::default()
        };

        let mut world = World::new();
        let spawn_point = Transform::from_xyz(10.0, 0.0, 5.0);
        let enemy = world.spawn(prefab.build(&spawn_point)).id();

        let transform = world.get::<Transform>(enemy).copied();
        assert_eq!(transform.map(|t| t.translation), Some(Vec3::new(11.0, 0.0, 5.0)));
        assert!(world.get::<DetectionModule>(enemy).is_some());
        assert!(world.get::<Animator>(enemy).is_some());
    }
}
