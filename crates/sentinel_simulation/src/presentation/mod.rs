//! Presentation domain — animation / audio / VFX cues
//!
//! ECS не проигрывает ничего сам: он пишет параметры аниматора и ambient
//! канала в компоненты, а дискретные cues отправляет событием `PresentationCue`.
//! Внешний слой (движок) читает их и воспроизводит.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle на particle system (VFX) во внешнем слое
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct EffectHandle(pub u32);

/// Handle на audio clip во внешнем слое
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct SoundClip(pub u32);

/// Audio mixer группа для one-shot звуков
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AudioGroup {
    EnemyAttack,
    EnemyDetection,
}

/// Presentation Sink — всё что state machine умеет "показать"
pub trait PresentationSink {
    fn set_animator_float(&mut self, name: &'static str, value: f32);
    fn set_animator_bool(&mut self, name: &'static str, value: bool);
    fn trigger_animation(&mut self, name: &'static str);
    fn play_effect(&mut self, effect: EffectHandle);
    fn stop_effect(&mut self, effect: EffectHandle);
    fn play_sound(&mut self, clip: SoundClip, position: Vec3, group: AudioGroup, volume: f32);
    /// Запустить loop на ambient канале (movement sound)
    fn play_ambient(&mut self, clip: SoundClip);
    fn set_ambient_pitch(&mut self, pitch: f32);
    fn set_ambient_volume(&mut self, volume: f32);
}

/// Дискретные cues для внешнего слоя
///
/// Continuous параметры (MoveSpeed, pitch) сюда НЕ попадают —
/// они живут в `Animator` / `AmbientSound`, чтобы не спамить событиями каждый тик.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationCue {
    SetAnimatorBool {
        entity: Entity,
        name: &'static str,
        value: bool,
    },
    TriggerAnimation {
        entity: Entity,
        name: &'static str,
    },
    PlayEffect {
        entity: Entity,
        effect: EffectHandle,
    },
    StopEffect {
        entity: Entity,
        effect: EffectHandle,
    },
    PlaySound {
        entity: Entity,
        clip: SoundClip,
        position: Vec3,
        group: AudioGroup,
        volume: f32,
    },
}

impl PresentationCue {
    pub fn entity(&self) -> Entity {
        match self {
            PresentationCue::SetAnimatorBool { entity, .. }
            | PresentationCue::TriggerAnimation { entity, .. }
            | PresentationCue::PlayEffect { entity, .. }
            | PresentationCue::StopEffect { entity, .. }
            | PresentationCue::PlaySound { entity, .. } => *entity,
        }
    }
}

/// Текущие параметры animation graph актора (зеркало для внешнего аниматора)
#[derive(Component, Debug, Clone, Default)]
pub struct Animator {
    pub floats: HashMap<&'static str, f32>,
    pub bools: HashMap<&'static str, bool>,
}

impl Animator {
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }
}

/// Ambient audio канал (loop movement sound, pitch зависит от скорости)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AmbientSound {
    pub clip: Option<SoundClip>,
    pub playing: bool,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for AmbientSound {
    fn default() -> Self {
        Self {
            clip: None,
            playing: false,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// ECS реализация PresentationSink для одной entity
///
/// Continuous state пишется в компоненты, дискретные cues копятся в буфер
/// и отправляются системой через `EventWriter::write_batch`.
pub struct EcsPresentation<'a> {
    pub entity: Entity,
    pub animator: &'a mut Animator,
    pub ambient: &'a mut AmbientSound,
    pub cues: &'a mut Vec<PresentationCue>,
}

impl PresentationSink for EcsPresentation<'_> {
    fn set_animator_float(&mut self, name: &'static str, value: f32) {
        self.animator.floats.insert(name, value);
    }

    fn set_animator_bool(&mut self, name: &'static str, value: bool) {
        self.animator.bools.insert(name, value);
        self.cues.push(PresentationCue::SetAnimatorBool {
            entity: self.entity,
            name,
            value,
        });
    }

    fn trigger_animation(&mut self, name: &'static str) {
        self.cues.push(PresentationCue::TriggerAnimation {
            entity: self.entity,
            name,
        });
    }

    fn play_effect(&mut self, effect: EffectHandle) {
        self.cues.push(PresentationCue::PlayEffect {
            entity: self.entity,
            effect,
        });
    }

    fn stop_effect(&mut self, effect: EffectHandle) {
        self.cues.push(PresentationCue::StopEffect {
            entity: self.entity,
            effect,
        });
    }

    fn play_sound(&mut self, clip: SoundClip, position: Vec3, group: AudioGroup, volume: f32) {
        self.cues.push(PresentationCue::PlaySound {
            entity: self.entity,
            clip,
            position,
            group,
            volume,
        });
    }

    fn play_ambient(&mut self, clip: SoundClip) {
        self.ambient.clip = Some(clip);
        self.ambient.playing = true;
    }

    fn set_ambient_pitch(&mut self, pitch: f32) {
        self.ambient.pitch = pitch;
    }

    fn set_ambient_volume(&mut self, volume: f32) {
        self.ambient.volume = volume.clamp(0.0, 1.0);
    }
}
