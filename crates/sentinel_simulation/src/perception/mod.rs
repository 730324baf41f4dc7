//! Perception / navigation facade — компоненты которые пишет внешний слой
//!
//! Архитектура:
//! - Внешний слой (vision cone, navmesh agent) пишет DetectionModule / NavAgent.velocity
//! - ECS читает их через `EnemyController` и пишет NavAgent.destination
//! - PatrolPath — данные пути патруля, прогресс ведёт ECS

use bevy::prelude::*;

/// Результаты perception для одного актора
///
/// `known_target` — не-владеющая ссылка на последнюю цель. Позиция цели
/// кэшируется в `known_target_position` системой `sync_known_target_positions`;
/// None означает stale reference (цель despawned или ещё не синхронизирована).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DetectionModule {
    pub is_seeing_target: bool,
    pub is_target_in_attack_range: bool,
    pub known_target: Option<Entity>,
    pub known_target_position: Option<Vec3>,
    /// Радиус атаки (метры)
    pub attack_range: f32,
    /// Радиус обнаружения (используется только headless perception)
    pub detection_range: f32,
    /// Смещение "глаз" относительно Transform (local space)
    pub detection_source_offset: Vec3,
}

impl Default for DetectionModule {
    fn default() -> Self {
        Self {
            is_seeing_target: false,
            is_target_in_attack_range: false,
            known_target: None,
            known_target_position: None,
            attack_range: 10.0,
            detection_range: 20.0,
            detection_source_offset: Vec3::new(0.0, 1.5, 0.0),
        }
    }
}

impl DetectionModule {
    /// World-space точка, от которой меряется дистанция до цели
    pub fn detection_source_point(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * self.detection_source_offset
    }

    /// Сбросить цель (target lost)
    pub fn forget_target(&mut self) {
        self.known_target = None;
        self.known_target_position = None;
        self.is_seeing_target = false;
        self.is_target_in_attack_range = false;
    }
}

/// Navmesh agent: destination пишет ECS, velocity — внешний locomotion
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub velocity: Vec3,
    /// Максимальная скорость (м/с), знаменатель для pitch
    pub max_speed: f32,
    /// Скорость поворота (slerp factor в секунду)
    pub orientation_speed: f32,
    /// Дистанция остановки у destination
    pub stopping_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            velocity: Vec3::ZERO,
            max_speed: 3.5,
            orientation_speed: 10.0,
            stopping_distance: 0.1,
        }
    }
}

/// Путь патруля (замкнутый список нод)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolPath {
    pub nodes: Vec<Vec3>,
    /// Индекс текущей ноды-назначения
    pub current: usize,
    /// Радиус "дошли до ноды"
    pub reach_radius: f32,
}

impl Default for PatrolPath {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            current: 0,
            reach_radius: 2.0,
        }
    }
}

impl PatrolPath {
    pub fn new(nodes: Vec<Vec3>, reach_radius: f32) -> Self {
        Self {
            nodes,
            current: 0,
            reach_radius,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Начать патруль с ближайшей ноды
    pub fn set_destination_to_closest_node(&mut self, position: Vec3) {
        let closest = self
            .nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(index, _)| index);

        if let Some(index) = closest {
            self.current = index;
        }
    }

    /// Актор в reach_radius от текущей ноды
    pub fn is_reached(&self, position: Vec3) -> bool {
        self.destination()
            .is_some_and(|destination| position.distance(destination) <= self.reach_radius)
    }

    /// Переключиться на следующую ноду если текущая достигнута
    pub fn update_destination(&mut self, position: Vec3) {
        if self.is_reached(position) {
            self.current = (self.current + 1) % self.nodes.len();
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.nodes.get(self.current).copied()
    }
}

/// Система: кэш позиции known_target
///
/// Цель могла быть despawned между тиками — тогда позиция None,
/// и Follow/Attack action этого тика пропускается.
pub fn sync_known_target_positions(
    mut detections: Query<&mut DetectionModule>,
    targets: Query<&Transform>,
) {
    for mut detection in detections.iter_mut() {
        let position = detection
            .known_target
            .and_then(|target| targets.get(target).ok())
            .map(|transform| transform.translation);

        if detection.known_target_position != position {
            detection.known_target_position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path() -> PatrolPath {
        PatrolPath::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 10.0),
            ],
            1.0,
        )
    }

    #[test]
    fn test_closest_node_selection() {
        let mut path = square_path();
        path.set_destination_to_closest_node(Vec3::new(9.0, 0.0, 8.0));
        assert_eq!(path.current, 2);
        assert_eq!(path.destination(), Some(Vec3::new(10.0, 0.0, 10.0)));
    }

    #[test]
    fn test_path_advances_and_wraps() {
        let mut path = square_path();
        path.current = 3;

        // Далеко от ноды — индекс не меняется
        path.update_destination(Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(path.current, 3);

        // В радиусе reach — следующая нода (wrap на 0)
        path.update_destination(Vec3::new(0.5, 0.0, 10.0));
        assert_eq!(path.current, 0);
    }

    #[test]
    fn test_empty_path_has_no_destination() {
        let mut path = PatrolPath::default();
        path.set_destination_to_closest_node(Vec3::ZERO);
        path.update_destination(Vec3::ZERO);
        assert!(!path.is_valid());
        assert_eq!(path.destination(), None);
    }

    #[test]
    fn test_detection_source_point_uses_offset() {
        let detection = DetectionModule::default();
        let transform = Transform::from_xyz(1.0, 0.0, 2.0);
        assert_eq!(
            detection.detection_source_point(&transform),
            Vec3::new(1.0, 1.5, 2.0)
        );
    }
}
