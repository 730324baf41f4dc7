//! Enemy Mobile — логика FSM Patrol / Follow / Attack
//!
//! Чистые функции поверх `EnemyController` + `PresentationSink`:
//! ECS системы (`ai::systems`) только собирают borrow компонентов и вызывают их.
//!
//! Порядок в тике:
//! 1. perception события (detected / lost / damaged / attack fired)
//! 2. `update_ai_state_transitions` — polled Follow ↔ Attack
//! 3. `update_current_ai_state` — действие текущего состояния
//! 4. `update_presentation` — MoveSpeed + pitch movement sound

use bevy::prelude::*;
use rand::Rng;

use crate::ai::components::{
    AIState, AttackVoice, EnemyMobile, MinMaxFloat, ANIM_ALERTED_PARAMETER,
    ANIM_ATTACK_PARAMETER, ANIM_MOVE_SPEED_PARAMETER, ANIM_ON_DAMAGED_PARAMETER,
};
use crate::ai::controller::EnemyController;
use crate::presentation::{AudioGroup, EffectHandle, PresentationSink};

/// Что сделал актор в этом тике
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    /// Patrol: destination = нода пути (или стоим, если пути нет)
    Patrolled,
    /// Follow: идём к цели
    Followed,
    /// Attack: `holding` = остановились на stop distance, `fired` = атака прошла cooldown
    Attacked { holding: bool, fired: bool },
    /// Follow/Attack без known target (stale reference) — тик пропущен
    SkippedNoTarget,
}

/// Случайный индекс в [0, len) или None для пустого набора
pub fn pick_random_index(len: usize, rng: &mut impl Rng) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// Инициализация presentation при спавне: запуск movement sound (с громкостью) + выбор голоса атаки
pub fn start_enemy_mobile(
    enemy: &EnemyMobile,
    rng: &mut impl Rng,
    sink: &mut impl PresentationSink,
) -> AttackVoice {
    if let Some(clip) = enemy.movement_sound {
        sink.play_ambient(clip);
        sink.set_ambient_volume(enemy.movement_sound_volume);
    }

    AttackVoice(pick_random_index(enemy.on_attack_voices.len(), rng))
}

/// Polled переходы Follow ↔ Attack
///
/// Возвращает предыдущее состояние если переход произошёл.
/// Patrol → Follow и * → Patrol здесь не проверяются (event-driven).
pub fn update_ai_state_transitions(
    state: &mut AIState,
    controller: &mut impl EnemyController,
) -> Option<AIState> {
    let previous = *state;

    match previous {
        AIState::Follow => {
            // Переход в атаку когда цель видна и в радиусе
            if controller.is_seeing_target() && controller.is_target_in_attack_range() {
                *state = AIState::Attack;
                let position = controller.position();
                controller.set_nav_destination(position);
            }
        }
        AIState::Attack => {
            if !controller.is_target_in_attack_range() {
                *state = AIState::Follow;
            }
        }
        AIState::Patrol => {}
    }

    (*state != previous).then_some(previous)
}

/// Действие текущего состояния (один раз за тик, после transitions)
pub fn update_current_ai_state(
    state: AIState,
    enemy: &EnemyMobile,
    attack_voice: AttackVoice,
    controller: &mut impl EnemyController,
    sink: &mut impl PresentationSink,
) -> StateAction {
    match state {
        AIState::Patrol => {
            controller.update_path_destination();
            if let Some(destination) = controller.path_destination() {
                controller.set_nav_destination(destination);
            }
            StateAction::Patrolled
        }

        AIState::Follow => {
            let Some(target) = controller.known_target_position() else {
                return StateAction::SkippedNoTarget;
            };

            controller.set_nav_destination(target);
            controller.orient_towards(target);
            controller.orient_weapons_towards(target);
            StateAction::Followed
        }

        AIState::Attack => {
            let Some(target) = controller.known_target_position() else {
                return StateAction::SkippedNoTarget;
            };

            let stop_distance = enemy.attack_stop_distance_ratio * controller.attack_range();
            let distance = target.distance(controller.detection_source_point());
            let holding = distance < stop_distance;

            if holding {
                let position = controller.position();
                controller.set_nav_destination(position);
            } else {
                controller.set_nav_destination(target);
            }

            controller.orient_towards(target);
            let fired = controller.try_attack(target);
            if fired {
                on_attack(enemy, attack_voice, controller.position(), sink);
            }

            StateAction::Attacked { holding, fired }
        }
    }
}

/// Pitch movement sound: lerp(min, max, speed / max_speed)
///
/// `max_speed <= 0` → доля 0 (min pitch).
pub fn movement_pitch(range: MinMaxFloat, speed: f32, max_speed: f32) -> f32 {
    let fraction = if max_speed > 0.0 { speed / max_speed } else { 0.0 };
    range.lerp(fraction)
}

/// Continuous presentation (не зависит от state)
pub fn update_presentation(
    enemy: &EnemyMobile,
    controller: &impl EnemyController,
    sink: &mut impl PresentationSink,
) {
    let move_speed = controller.velocity_magnitude();

    sink.set_animator_float(ANIM_MOVE_SPEED_PARAMETER, move_speed);
    sink.set_ambient_pitch(movement_pitch(
        enemy.pitch_distortion_movement_speed,
        move_speed,
        controller.max_speed(),
    ));
}

/// Callback: цель обнаружена
///
/// Patrol → Follow. Эффекты проигрываются всегда (повтор в Follow/Attack допустим).
/// Возвращает true если state изменился.
pub fn on_detected_target(
    state: &mut AIState,
    enemy: &EnemyMobile,
    position: Vec3,
    sink: &mut impl PresentationSink,
) -> bool {
    let changed = *state == AIState::Patrol;
    if changed {
        *state = AIState::Follow;
    }

    for &effect in &enemy.on_detect_vfx {
        sink.play_effect(effect);
    }

    if let Some(clip) = enemy.on_detect_sfx {
        sink.play_sound(clip, position, AudioGroup::EnemyDetection, 1.0);
    }

    sink.set_animator_bool(ANIM_ALERTED_PARAMETER, true);
    changed
}

/// Callback: цель потеряна
///
/// Follow/Attack → Patrol. Возвращает true если state изменился.
pub fn on_lost_target(
    state: &mut AIState,
    enemy: &EnemyMobile,
    sink: &mut impl PresentationSink,
) -> bool {
    let changed = matches!(*state, AIState::Follow | AIState::Attack);
    if changed {
        *state = AIState::Patrol;
    }

    for &effect in &enemy.on_detect_vfx {
        sink.stop_effect(effect);
    }

    sink.set_animator_bool(ANIM_ALERTED_PARAMETER, false);
    changed
}

/// Callback: получен урон (state не меняется)
pub fn on_damaged(
    enemy: &EnemyMobile,
    rng: &mut impl Rng,
    sink: &mut impl PresentationSink,
) -> Option<EffectHandle> {
    let spark = pick_random_index(enemy.random_hit_sparks.len(), rng)
        .map(|index| enemy.random_hit_sparks[index]);

    if let Some(effect) = spark {
        sink.play_effect(effect);
    }

    sink.trigger_animation(ANIM_ON_DAMAGED_PARAMETER);
    spark
}

/// Callback: атака произошла (state не меняется)
pub fn on_attack(
    enemy: &EnemyMobile,
    attack_voice: AttackVoice,
    position: Vec3,
    sink: &mut impl PresentationSink,
) {
    let voice = attack_voice
        .0
        .and_then(|index| enemy.on_attack_voices.get(index).copied());

    if let Some(clip) = voice {
        sink.play_sound(clip, position, AudioGroup::EnemyAttack, 1.0);
    }

    sink.trigger_animation(ANIM_ATTACK_PARAMETER);
}
