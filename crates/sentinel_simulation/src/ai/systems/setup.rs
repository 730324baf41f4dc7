//! Enemy setup: проверка зависимостей + старт FSM.

use bevy::prelude::*;

use crate::ai::components::{AIState, EnemyMobile, SetupFailed};
use crate::ai::enemy_mobile::start_enemy_mobile;
use crate::ai::events::EnemySetupFailed;
use crate::combat::Attacker;
use crate::error::SetupError;
use crate::perception::{DetectionModule, NavAgent, PatrolPath};
use crate::presentation::{AmbientSound, Animator, EcsPresentation, PresentationCue};
use crate::DeterministicRng;

/// Первая отсутствующая зависимость → MissingDependency
pub fn check_dependencies(
    entity: Entity,
    dependencies: &[(&'static str, bool)],
) -> Result<(), SetupError> {
    match dependencies.iter().find(|(_, present)| !present) {
        Some(&(dependency, _)) => Err(SetupError::MissingDependency { entity, dependency }),
        None => Ok(()),
    }
}

/// Система: инициализация новых EnemyMobile
///
/// Успех:
/// - PatrolPath destination = ближайшая нода
/// - movement sound запущен на ambient канале
/// - вставляются AIState::Patrol + AttackVoice (с этого момента актор тикается)
///
/// Провал (нет perception facade / presentation sink компонентов):
/// - error лог, событие EnemySetupFailed, маркер SetupFailed, AIState НЕ вставляется
pub fn initialize_enemy_mobiles(
    mut commands: Commands,
    mut new_enemies: Query<
        (
            Entity,
            &EnemyMobile,
            &Transform,
            Has<DetectionModule>,
            Has<NavAgent>,
            Has<Attacker>,
            Option<&mut Animator>,
            Option<&mut AmbientSound>,
            Option<&mut PatrolPath>,
        ),
        Added<EnemyMobile>,
    >,
    mut rng: ResMut<DeterministicRng>,
    mut failures: EventWriter<EnemySetupFailed>,
    mut cues: EventWriter<PresentationCue>,
) {
    for (entity, enemy, transform, has_detection, has_nav, has_attacker, animator, ambient, patrol) in
        new_enemies.iter_mut()
    {
        let checked = check_dependencies(
            entity,
            &[
                ("DetectionModule", has_detection),
                ("NavAgent", has_nav),
                ("Attacker", has_attacker),
                ("Animator", animator.is_some()),
                ("AmbientSound", ambient.is_some()),
            ],
        );

        let (Ok(()), Some(mut animator), Some(mut ambient)) = (checked.clone(), animator, ambient)
        else {
            if let Err(error) = checked {
                crate::log_error(&format!("❌ Enemy setup failed: {}", error));
                commands.entity(entity).insert(SetupFailed(error.clone()));
                failures.write(EnemySetupFailed { entity, error });
            }
            continue;
        };

        if let Some(mut patrol) = patrol {
            patrol.set_destination_to_closest_node(transform.translation);
        }

        let mut buffered = Vec::new();
        let attack_voice = {
            let mut sink = EcsPresentation {
                entity,
                animator: &mut animator,
                ambient: &mut ambient,
                cues: &mut buffered,
            };
            start_enemy_mobile(enemy, &mut rng.rng, &mut sink)
        };
        cues.write_batch(buffered);

        commands
            .entity(entity)
            .insert((AIState::default(), attack_voice));

        crate::log_info(&format!(
            "🤖 Enemy {:?} initialized at {:?} (attack voice: {:?})",
            entity, transform.translation, attack_voice.0
        ));
    }
}
