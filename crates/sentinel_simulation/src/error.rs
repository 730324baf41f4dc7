//! Ошибки setup/config
//!
//! Steady-state тик ошибок не возвращает: stale target и пустые наборы
//! эффектов просто пропускаются. Наружу уходят только ошибки инициализации.

use bevy::prelude::Entity;
use thiserror::Error;

/// Ошибка инициализации врага
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Нет обязательного collaborator компонента (perception facade / presentation sink)
    #[error("enemy {entity:?} is missing required dependency `{dependency}`")]
    MissingDependency {
        entity: Entity,
        dependency: &'static str,
    },
}

/// Ошибка загрузки tuning файла
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
