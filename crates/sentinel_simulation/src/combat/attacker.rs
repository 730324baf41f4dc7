//! Attacker component — combat facade для `try_attack`
//!
//! State machine атакует каждый тик в Attack state, а rate-limit живёт здесь:
//! выстрел проходит только когда cooldown истёк.

use bevy::prelude::*;

/// Attacker — cooldown атаки + последняя точка атаки
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(WeaponAim)]
pub struct Attacker {
    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,

    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,

    /// Куда была направлена последняя успешная атака
    pub last_attack_point: Option<Vec3>,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            attack_cooldown: 1.0,
            cooldown_timer: 0.0,
            last_attack_point: None,
        }
    }
}

impl Attacker {
    pub fn new(attack_cooldown: f32) -> Self {
        Self {
            attack_cooldown,
            ..Default::default()
        }
    }

    /// Может ли атаковать (cooldown == 0)
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Попытка атаки: true если выстрел произошёл (cooldown перезапущен)
    pub fn try_fire(&mut self, point: Vec3) -> bool {
        if !self.can_attack() {
            return false;
        }

        self.cooldown_timer = self.attack_cooldown;
        self.last_attack_point = Some(point);
        true
    }
}

/// Куда смотрят стволы (orient_weapons_towards)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct WeaponAim {
    pub target: Option<Vec3>,
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut Attacker>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        if attacker.cooldown_timer > 0.0 {
            attacker.cooldown_timer = (attacker.cooldown_timer - delta).max(0.0);
        }
    }
}
