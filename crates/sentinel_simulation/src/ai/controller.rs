//! EnemyController — perception/navigation/combat facade для state machine
//!
//! Логика FSM (`ai::enemy_mobile`) знает только этот trait.
//! `EcsEnemyController` — реализация поверх компонентов одной entity.

use bevy::ecs::query::QueryItem;
use bevy::prelude::*;

use crate::combat::{Attacker, WeaponAim};
use crate::perception::{DetectionModule, NavAgent, PatrolPath};

pub trait EnemyController {
    fn is_seeing_target(&self) -> bool;
    fn is_target_in_attack_range(&self) -> bool;
    /// Не-владеющая ссылка на последнюю обнаруженную цель
    fn known_target(&self) -> Option<Entity>;
    /// Позиция known target; None = stale reference
    fn known_target_position(&self) -> Option<Vec3>;
    fn attack_range(&self) -> f32;
    fn detection_source_point(&self) -> Vec3;
    /// Текущая позиция актора
    fn position(&self) -> Vec3;
    fn set_nav_destination(&mut self, destination: Vec3);
    fn velocity_magnitude(&self) -> f32;
    fn max_speed(&self) -> f32;
    fn orient_towards(&mut self, point: Vec3);
    fn orient_weapons_towards(&mut self, point: Vec3);
    /// Продвинуть прогресс по пути патруля
    fn update_path_destination(&mut self);
    /// Текущая нода-назначение пути (None если пути нет)
    fn path_destination(&self) -> Option<Vec3>;
    /// true если атака реально произошла (cooldown у combat facade)
    fn try_attack(&mut self, point: Vec3) -> bool;
}

/// QueryData всех компонентов, из которых собирается `EcsEnemyController`
pub type EnemyControllerData = (
    &'static mut Transform,
    &'static DetectionModule,
    &'static mut NavAgent,
    Option<&'static mut PatrolPath>,
    &'static mut Attacker,
    &'static mut WeaponAim,
);

/// ECS реализация EnemyController (borrow компонентов на время одного тика)
///
/// Компоненты хранятся как `Mut`: change detection срабатывает только
/// на реальную запись, чтение через controller ничего не помечает.
pub struct EcsEnemyController<'a> {
    pub transform: Mut<'a, Transform>,
    pub detection: &'a DetectionModule,
    pub nav: Mut<'a, NavAgent>,
    pub patrol: Option<Mut<'a, PatrolPath>>,
    pub attacker: Mut<'a, Attacker>,
    pub aim: Mut<'a, WeaponAim>,
    /// Fixed delta (секунды) для сглаживания поворота
    pub delta: f32,
}

impl<'a> EcsEnemyController<'a> {
    pub fn from_item<'w: 'a>(item: &'a mut QueryItem<'w, EnemyControllerData>, delta: f32) -> Self {
        let (transform, detection, nav, patrol, attacker, aim) = item;
        Self {
            transform: transform.reborrow(),
            detection: *detection,
            nav: nav.reborrow(),
            patrol: patrol.as_mut().map(|patrol| patrol.reborrow()),
            attacker: attacker.reborrow(),
            aim: aim.reborrow(),
            delta,
        }
    }
}

impl EnemyController for EcsEnemyController<'_> {
    fn is_seeing_target(&self) -> bool {
        self.detection.is_seeing_target
    }

    fn is_target_in_attack_range(&self) -> bool {
        self.detection.is_target_in_attack_range
    }

    fn known_target(&self) -> Option<Entity> {
        self.detection.known_target
    }

    fn known_target_position(&self) -> Option<Vec3> {
        self.detection.known_target?;
        self.detection.known_target_position
    }

    fn attack_range(&self) -> f32 {
        self.detection.attack_range
    }

    fn detection_source_point(&self) -> Vec3 {
        self.detection.detection_source_point(&self.transform)
    }

    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_nav_destination(&mut self, destination: Vec3) {
        if self.nav.destination != Some(destination) {
            self.nav.destination = Some(destination);
        }
    }

    fn velocity_magnitude(&self) -> f32 {
        self.nav.velocity.length()
    }

    fn max_speed(&self) -> f32 {
        self.nav.max_speed
    }

    fn orient_towards(&mut self, point: Vec3) {
        // Поворот только вокруг вертикали
        let mut look_direction = point - self.transform.translation;
        look_direction.y = 0.0;
        if look_direction.length_squared() < 1e-6 {
            return;
        }

        let target_rotation = Transform::IDENTITY
            .looking_to(look_direction, Vec3::Y)
            .rotation;
        let t = (self.nav.orientation_speed * self.delta).min(1.0);
        let rotation = self.transform.rotation.slerp(target_rotation, t);
        if rotation != self.transform.rotation {
            self.transform.rotation = rotation;
        }
    }

    fn orient_weapons_towards(&mut self, point: Vec3) {
        if self.aim.target != Some(point) {
            self.aim.target = Some(point);
        }
    }

    fn update_path_destination(&mut self) {
        let position = self.transform.translation;
        if let Some(patrol) = self.patrol.as_mut() {
            if patrol.is_reached(position) {
                patrol.update_destination(position);
            }
        }
    }

    fn path_destination(&self) -> Option<Vec3> {
        self.patrol.as_deref().and_then(PatrolPath::destination)
    }

    fn try_attack(&mut self, point: Vec3) -> bool {
        self.orient_weapons_towards(point);
        if !self.attacker.can_attack() {
            return false;
        }
        self.attacker.try_fire(point)
    }
}
