//! AI decision-making module
//!
//! Фиксированный FSM мобильного врага: Patrol → Follow → Attack.
//! Логика — `enemy_mobile` (чистые функции над `EnemyController` + `PresentationSink`),
//! ECS обвязка — `systems`.

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod enemy_mobile;
pub mod events;
pub mod systems;


// Re-export основных типов
pub use components::{AIState, AttackVoice, EnemyMobile, MinMaxFloat, SetupFailed};
pub use controller::{EcsEnemyController, EnemyController, EnemyControllerData};
pub use events::{AIStateChanged, EnemyEvent, EnemySetupFailed};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. initialize_enemy_mobiles — проверка зависимостей, старт FSM (Spawn set)
/// 2. tick_attack_cooldowns, sync_known_target_positions (Perception set)
/// 3. handle_enemy_events — detect/lost/damaged/attack callbacks
/// 4. enemy_fsm_transitions — polled Follow ↔ Attack
/// 5. enemy_state_actions — действие текущего состояния
/// 6. update_enemy_presentation — MoveSpeed + pitch
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyEvent>()
            .add_event::<EnemySetupFailed>()
            .add_event::<AIStateChanged>()
            .add_event::<crate::presentation::PresentationCue>();

        app.add_systems(
            FixedUpdate,
            systems::initialize_enemy_mobiles.in_set(SimulationSet::Spawn),
        )
        .add_systems(
            FixedUpdate,
            (
                crate::combat::tick_attack_cooldowns,
                crate::perception::sync_known_target_positions,
            )
                .chain()
                .in_set(SimulationSet::Perception),
        )
        .add_systems(
            FixedUpdate,
            (
                systems::handle_enemy_events,
                systems::enemy_fsm_transitions,
                systems::enemy_state_actions,
                systems::update_enemy_presentation,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Decision),
        );
    }
}
