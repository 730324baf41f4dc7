//! FSM AI systems (perception callbacks, transitions, state actions, presentation).

use bevy::prelude::*;

use crate::ai::components::{AIState, AttackVoice, EnemyMobile};
use crate::ai::controller::{EcsEnemyController, EnemyControllerData};
use crate::ai::enemy_mobile::{
    on_attack, on_damaged, on_detected_target, on_lost_target, update_ai_state_transitions,
    update_current_ai_state, update_presentation, StateAction,
};
use crate::ai::events::{AIStateChanged, EnemyEvent};
use crate::presentation::{AmbientSound, Animator, EcsPresentation, PresentationCue};
use crate::DeterministicRng;

/// Система: perception/combat callbacks → FSM
///
/// Дренирует EnemyEvent ДО polled transitions: detect/lost edge
/// перекрывает polling в том же тике. События для despawned или
/// неинициализированных врагов игнорируются.
pub fn handle_enemy_events(
    mut events: EventReader<EnemyEvent>,
    mut enemies: Query<(
        &mut AIState,
        &EnemyMobile,
        &AttackVoice,
        &Transform,
        &mut Animator,
        &mut AmbientSound,
    )>,
    mut rng: ResMut<DeterministicRng>,
    mut cues: EventWriter<PresentationCue>,
    mut transitions: EventWriter<AIStateChanged>,
) {
    for event in events.read() {
        let entity = event.enemy();
        let Ok((mut state, enemy, attack_voice, transform, mut animator, mut ambient)) =
            enemies.get_mut(entity)
        else {
            continue;
        };

        let mut next = *state;
        let mut buffered = Vec::new();
        {
            let mut sink = EcsPresentation {
                entity,
                animator: &mut animator,
                ambient: &mut ambient,
                cues: &mut buffered,
            };

            match event {
                EnemyEvent::DetectedTarget { .. } => {
                    on_detected_target(&mut next, enemy, transform.translation, &mut sink);
                }
                EnemyEvent::LostTarget { .. } => {
                    on_lost_target(&mut next, enemy, &mut sink);
                }
                EnemyEvent::Damaged { .. } => {
                    on_damaged(enemy, &mut rng.rng, &mut sink);
                }
                EnemyEvent::AttackFired { .. } => {
                    on_attack(enemy, *attack_voice, transform.translation, &mut sink);
                }
            }
        }
        cues.write_batch(buffered);

        if next != *state {
            crate::log(&format!("👁️ {:?} {:?} → {:?} ({:?})", entity, *state, next, event));
            transitions.write(AIStateChanged {
                entity,
                from: *state,
                to: next,
            });
            *state = next;
        }
    }
}

/// Система: polled переходы Follow ↔ Attack
pub fn enemy_fsm_transitions(
    mut enemies: Query<(Entity, &mut AIState, EnemyControllerData)>,
    time: Res<Time<Fixed>>,
    mut transitions: EventWriter<AIStateChanged>,
) {
    let delta = time.delta_secs();

    for (entity, mut state, mut data) in enemies.iter_mut() {
        let mut controller = EcsEnemyController::from_item(&mut data, delta);
        let mut next = *state;

        if let Some(previous) = update_ai_state_transitions(&mut next, &mut controller) {
            crate::log(&format!("⚔️ {:?} {:?} → {:?}", entity, previous, next));
            transitions.write(AIStateChanged {
                entity,
                from: previous,
                to: next,
            });
            *state = next;
        }
    }
}

/// Система: действие текущего состояния
///
/// Attack: успешный try_attack сразу вызывает on_attack (голос + trigger).
pub fn enemy_state_actions(
    mut enemies: Query<(
        Entity,
        &AIState,
        &EnemyMobile,
        &AttackVoice,
        &mut Animator,
        &mut AmbientSound,
        EnemyControllerData,
    )>,
    time: Res<Time<Fixed>>,
    mut cues: EventWriter<PresentationCue>,
) {
    let delta = time.delta_secs();
    let mut buffered = Vec::new();

    for (entity, state, enemy, attack_voice, mut animator, mut ambient, mut data) in
        enemies.iter_mut()
    {
        let mut controller = EcsEnemyController::from_item(&mut data, delta);
        let mut sink = EcsPresentation {
            entity,
            animator: &mut animator,
            ambient: &mut ambient,
            cues: &mut buffered,
        };

        let action = update_current_ai_state(*state, enemy, *attack_voice, &mut controller, &mut sink);

        match action {
            StateAction::SkippedNoTarget => {
                crate::log(&format!("{:?} {:?}: no known target, action skipped", entity, state));
            }
            StateAction::Attacked { fired: true, .. } => {
                crate::log(&format!("🔫 {:?} attacking {:?}", entity, controller.detection.known_target));
            }
            _ => {}
        }
    }

    cues.write_batch(buffered);
}

/// Система: continuous presentation (MoveSpeed + pitch movement sound)
pub fn update_enemy_presentation(
    mut enemies: Query<
        (
            Entity,
            &EnemyMobile,
            &mut Animator,
            &mut AmbientSound,
            EnemyControllerData,
        ),
        With<AIState>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, enemy, mut animator, mut ambient, mut data) in enemies.iter_mut() {
        let controller = EcsEnemyController::from_item(&mut data, delta);
        // Continuous параметры не генерируют cues
        let mut unused = Vec::new();
        let mut sink = EcsPresentation {
            entity,
            animator: &mut animator,
            ambient: &mut ambient,
            cues: &mut unused,
        };

        update_presentation(enemy, &controller, &mut sink);
    }
}
