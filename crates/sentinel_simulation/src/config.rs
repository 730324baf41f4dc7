//! Tuning config
//!
//! Параметры spawner'а и prefab'а врага грузятся из tuning.toml,
//! чтобы крутить баланс без перекомпиляции.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::spawner::{EnemyPrefab, SpawnerConfig};

/// Путь tuning файла по умолчанию (относительно рабочей директории)
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Корневая структура tuning.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub spawner: SpawnerConfig,
    pub prefab: EnemyPrefab,
}

impl TuningConfig {
    /// Читает и валидирует TOML файл
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TuningConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Как `load`, но при любой ошибке — warning + дефолты
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                crate::log_warning(&format!(
                    "⚠️ Tuning {} not loaded ({}), using defaults",
                    path.display(),
                    error
                ));
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.prefab.enemy.attack_stop_distance_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::Invalid {
                field: "prefab.enemy.attack_stop_distance_ratio",
                reason: format!("{} is outside [0, 1]", ratio),
            });
        }

        let volume = self.prefab.enemy.movement_sound_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::Invalid {
                field: "prefab.enemy.movement_sound_volume",
                reason: format!("{} is outside [0, 1]", volume),
            });
        }

        if self.spawner.spawn_period_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "spawner.spawn_period_ticks",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.prefab.max_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "prefab.max_speed",
                reason: format!("{} is negative", self.prefab.max_speed),
            });
        }

        // NaN тоже не проходит
        if !(self.prefab.attack_range > 0.0) {
            return Err(ConfigError::Invalid {
                field: "prefab.attack_range",
                reason: format!("{} must be positive", self.prefab.attack_range),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TuningConfig::from_toml_str(
            r#"
            [spawner]
            max_spawn_count = 5

            [prefab]
            max_speed = 6.0

            [prefab.enemy]
            attack_stop_distance_ratio = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.spawner.max_spawn_count, 5);
        assert_eq!(config.spawner.spawn_period_ticks, 30);
        assert_eq!(config.prefab.max_speed, 6.0);
        assert_eq!(config.prefab.attack_range, 10.0);
        assert_eq!(config.prefab.enemy.attack_stop_distance_ratio, 0.25);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[spawner]\nmax_spawn_count = 2\nspawn_period_ticks = 10\n\n[prefab]\npatrol_nodes = [[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]"
        )
        .unwrap();

        let config = TuningConfig::load(file.path()).unwrap();
        assert_eq!(config.spawner.spawn_period_ticks, 10);
        assert_eq!(config.prefab.patrol_nodes.len(), 2);
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = TuningConfig::from_toml_str("[spawner]\nspawn_period_ticks = 0\n");

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "spawner.spawn_period_ticks",
                ..
            })
        ));
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let result =
            TuningConfig::from_toml_str("[prefab.enemy]\nattack_stop_distance_ratio = 1.5\n");

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let result =
            TuningConfig::from_toml_str("[prefab.enemy]\nmovement_sound_volume = -0.1\n");

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "prefab.enemy.movement_sound_volume",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_error_reported() {
        let result = TuningConfig::from_toml_str("[spawner\nmax_spawn_count = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        assert!(matches!(TuningConfig::load(&missing), Err(ConfigError::Io(_))));
        assert_eq!(TuningConfig::load_or_default(&missing), TuningConfig::default());
    }
}
