//! FSM AI components (state, per-enemy config, attack voice).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::presentation::{EffectHandle, SoundClip};

/// Animator параметры которые дёргает state machine
pub const ANIM_MOVE_SPEED_PARAMETER: &str = "MoveSpeed";
pub const ANIM_ATTACK_PARAMETER: &str = "Attack";
pub const ANIM_ALERTED_PARAMETER: &str = "Alerted";
pub const ANIM_ON_DAMAGED_PARAMETER: &str = "OnDamaged";

/// AI FSM состояния
///
/// Вставляется только после успешной инициализации (см. `initialize_enemy_mobiles`),
/// поэтому наличие компонента == актор тикается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Patrol — идём по PatrolPath, начальное состояние
    #[default]
    Patrol,

    /// Follow — цель обнаружена, сближаемся
    Follow,

    /// Attack — цель видна и в радиусе атаки
    Attack,
}

/// Диапазон [min, max] для lerp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct MinMaxFloat {
    pub min: f32,
    pub max: f32,
}

impl Default for MinMaxFloat {
    fn default() -> Self {
        Self { min: 0.8, max: 1.2 }
    }
}

impl MinMaxFloat {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Lerp min → max, `t` клампится в [0, 1]
    pub fn lerp(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        self.min + (self.max - self.min) * t
    }
}

/// Конфиг мобильного врага (задаётся при спавне, дальше read-only)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyMobile {
    /// Доля attack range, на которой враг перестаёт сближаться в Attack
    pub attack_stop_distance_ratio: f32,
    /// Случайные hit-spark эффекты при получении урона
    pub random_hit_sparks: Vec<EffectHandle>,
    /// VFX которые горят пока цель обнаружена
    pub on_detect_vfx: Vec<EffectHandle>,
    pub on_detect_sfx: Option<SoundClip>,
    /// Набор голосов атаки (один выбирается при спавне)
    pub on_attack_voices: Vec<SoundClip>,
    pub movement_sound: Option<SoundClip>,
    /// Громкость ambient канала movement sound [0, 1]
    pub movement_sound_volume: f32,
    /// Pitch movement sound: speed 0 → min, max_speed → max
    pub pitch_distortion_movement_speed: MinMaxFloat,
}

impl Default for EnemyMobile {
    fn default() -> Self {
        Self {
            attack_stop_distance_ratio: 0.5,
            random_hit_sparks: Vec::new(),
            on_detect_vfx: Vec::new(),
            on_detect_sfx: None,
            on_attack_voices: Vec::new(),
            movement_sound: None,
            movement_sound_volume: 1.0,
            pitch_distortion_movement_speed: MinMaxFloat::default(),
        }
    }
}

/// Индекс голоса атаки, выбран один раз при инициализации
///
/// None если `on_attack_voices` пуст.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct AttackVoice(pub Option<usize>);

/// Маркер: инициализация провалилась, актор не тикается
#[derive(Component, Debug, Clone)]
pub struct SetupFailed(pub crate::error::SetupError);
