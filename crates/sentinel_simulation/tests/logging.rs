//! Logger integration: setup failures и переходы FSM попадают в printer
//!
//! Один тест на файл: logger глобальный, параллельные тесты делили бы буфер.

use bevy::prelude::*;
use sentinel_simulation::combat::Attacker;
use sentinel_simulation::logger::{set_log_level, set_logger, BufferLogger};
use sentinel_simulation::perception::{DetectionModule, NavAgent};
use sentinel_simulation::presentation::{AmbientSound, Animator};
use sentinel_simulation::{create_headless_app, run_fixed_ticks, EnemyEvent, EnemyMobile, LogLevel};

#[test]
fn test_setup_failure_and_transitions_are_logged() {
    let buffer = BufferLogger::new();
    set_logger(Box::new(buffer.clone()));
    set_log_level(LogLevel::Debug);

    let mut app = create_headless_app(42);

    // Без Animator → setup провален
    let broken = app
        .world_mut()
        .spawn((
            EnemyMobile::default(),
            Transform::default(),
            DetectionModule::default(),
            NavAgent::default(),
            Attacker::new(1.0),
            AmbientSound::default(),
        ))
        .id();
    let enemy = app
        .world_mut()
        .spawn((
            EnemyMobile::default(),
            Transform::default(),
            DetectionModule::default(),
            NavAgent::default(),
            Attacker::new(1.0),
            Animator::default(),
            AmbientSound::default(),
        ))
        .id();

    run_fixed_ticks(&mut app, 1);

    let lines = buffer.lines();
    let failure = lines
        .iter()
        .find(|(level, line)| *level == LogLevel::Error && line.contains("Enemy setup failed"));
    assert!(failure.is_some(), "no setup failure line in {:?}", lines);
    let (_, failure) = failure.unwrap();
    assert!(failure.contains("Animator"));
    assert!(failure.contains(&format!("{:?}", broken)));

    app.world_mut().send_event(EnemyEvent::DetectedTarget { enemy });
    run_fixed_ticks(&mut app, 1);

    let transition = format!("{:?} Patrol → Follow", enemy);
    assert!(
        buffer
            .lines()
            .iter()
            .any(|(level, line)| *level == LogLevel::Debug && line.contains(&transition)),
        "no transition line for {:?}",
        enemy
    );

    // Ниже минимального уровня ничего не пишется
    set_log_level(LogLevel::Warning);
    let before = buffer.lines().len();
    app.world_mut().send_event(EnemyEvent::LostTarget { enemy });
    run_fixed_ticks(&mut app, 1);
    assert_eq!(buffer.lines().len(), before);
}
