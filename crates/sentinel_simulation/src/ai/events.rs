//! AI Events — perception/combat callbacks для FSM
//!
//! Внешний слой (vision, hitbox, weapon) пишет события, ECS дренирует их
//! один раз за тик ДО polled transitions (`handle_enemy_events`).

use bevy::prelude::*;

use crate::error::SetupError;

/// Callback от perception/combat facade, адресованный конкретному врагу
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum EnemyEvent {
    /// Цель обнаружена (DetectionModule.known_target уже заполнен)
    DetectedTarget { enemy: Entity },

    /// Цель потеряна
    LostTarget { enemy: Entity },

    /// Враг получил урон (бухгалтерия HP — во внешнем слое)
    Damaged { enemy: Entity },

    /// Оружие выстрелило вне FSM (например, скриптовая атака)
    AttackFired { enemy: Entity },
}

impl EnemyEvent {
    pub fn enemy(&self) -> Entity {
        match self {
            EnemyEvent::DetectedTarget { enemy }
            | EnemyEvent::LostTarget { enemy }
            | EnemyEvent::Damaged { enemy }
            | EnemyEvent::AttackFired { enemy } => *enemy,
        }
    }
}

/// Инициализация врага провалилась (единственная ошибка, которая уходит наружу)
#[derive(Event, Debug, Clone)]
pub struct EnemySetupFailed {
    pub entity: Entity,
    pub error: SetupError,
}

/// Переход FSM (для debug overlay / логов / тестов)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AIStateChanged {
    pub entity: Entity,
    pub from: crate::ai::AIState,
    pub to: crate::ai::AIState,
}
