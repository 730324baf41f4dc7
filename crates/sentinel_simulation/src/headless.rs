//! Headless stand-ins для внешнего tactical слоя
//!
//! Без движка некому заполнять DetectionModule и NavAgent.velocity.
//! Этот plugin даёт минимальную замену (как collision resolution вместо
//! физики в headless режиме):
//! - proximity perception: только дистанция, без line of sight
//! - straight-line locomotion: прямо к destination на max_speed

use bevy::prelude::*;

use crate::ai::{AIState, EnemyEvent};
use crate::perception::{DetectionModule, NavAgent};
use crate::SimulationSet;

/// Маркер: entity может быть обнаружена headless perception
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct DetectableTarget;

/// Система: proximity perception → DetectionModule + EnemyEvent edges
///
/// Ближайшая DetectableTarget в detection_range становится known target.
/// Появление цели → DetectedTarget, исчезновение → LostTarget.
pub fn headless_proximity_perception(
    mut enemies: Query<(Entity, &Transform, &mut DetectionModule), With<AIState>>,
    targets: Query<(Entity, &Transform), With<DetectableTarget>>,
    mut events: EventWriter<EnemyEvent>,
) {
    for (enemy, transform, mut detection) in enemies.iter_mut() {
        let source = detection.detection_source_point(transform);

        let nearest = targets
            .iter()
            .filter(|(target, _)| *target != enemy)
            .map(|(target, target_transform)| {
                (target, target_transform.translation.distance(source))
            })
            .filter(|(_, distance)| *distance <= detection.detection_range)
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        let had_target = detection.known_target.is_some();

        match nearest {
            Some((target, distance)) => {
                detection.known_target = Some(target);
                detection.is_seeing_target = true;
                detection.is_target_in_attack_range = distance <= detection.attack_range;

                if !had_target {
                    events.write(EnemyEvent::DetectedTarget { enemy });
                }
            }
            None => {
                if had_target {
                    detection.forget_target();
                    events.write(EnemyEvent::LostTarget { enemy });
                }
            }
        }
    }
}

/// Система: движение по прямой к NavAgent.destination (только XZ плоскость)
pub fn headless_locomotion(
    mut agents: Query<(&mut Transform, &mut NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        let Some(destination) = nav.destination else {
            if nav.velocity != Vec3::ZERO {
                nav.velocity = Vec3::ZERO;
            }
            continue;
        };

        let mut to_destination = destination - transform.translation;
        to_destination.y = 0.0;
        let distance = to_destination.length();

        if distance <= nav.stopping_distance || delta <= 0.0 {
            if nav.velocity != Vec3::ZERO {
                nav.velocity = Vec3::ZERO;
            }
            continue;
        }

        let step = (nav.max_speed * delta).min(distance);
        let direction = to_destination / distance;
        transform.translation += direction * step;
        nav.velocity = direction * (step / delta);
    }
}

/// Headless Plugin (опционально, для headless прогонов и тестов)
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            headless_proximity_perception
                .in_set(SimulationSet::Perception)
                .before(crate::perception::sync_known_target_positions),
        )
        .add_systems(
            FixedUpdate,
            headless_locomotion.in_set(SimulationSet::Locomotion),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn locomotion_world() -> World {
        let mut world = World::new();
        let mut time = Time::<Fixed>::from_hz(10.0);
        time.advance_by(Duration::from_millis(100));
        world.insert_resource(time);
        world
    }

    #[test]
    fn test_locomotion_moves_towards_destination() {
        let mut world = locomotion_world();
        let agent = world
            .spawn((
                Transform::default(),
                NavAgent {
                    destination: Some(Vec3::new(10.0, 0.0, 0.0)),
                    max_speed: 5.0,
                    ..Default::default()
                },
            ))
            .id();

        let _ = world.run_system_once(headless_locomotion);

        let translation = world.get::<Transform>(agent).map(|t| t.translation).unwrap();
        let velocity = world.get::<NavAgent>(agent).map(|n| n.velocity).unwrap();
        // 5 м/с × 0.1 сек = 0.5 м
        assert!(translation.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-4), "{:?}", translation);
        assert!(velocity.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-3), "{:?}", velocity);
    }

    #[test]
    fn test_locomotion_stops_at_destination() {
        let mut world = locomotion_world();
        let agent = world
            .spawn((
                Transform::from_xyz(1.0, 0.0, 0.0),
                NavAgent {
                    destination: Some(Vec3::new(1.05, 0.0, 0.0)),
                    velocity: Vec3::X,
                    ..Default::default()
                },
            ))
            .id();

        let _ = world.run_system_once(headless_locomotion);

        let velocity = world.get::<NavAgent>(agent).map(|n| n.velocity);
        assert_eq!(velocity, Some(Vec3::ZERO));
    }
}
