//! Combat facade
//!
//! ECS ответственность: только cooldown атаки (rate-limit `try_attack`).
//! Урон, health, hitbox — внешний слой, сюда не попадают.

pub mod attacker;

pub use attacker::{tick_attack_cooldowns, Attacker, WeaponAim};
