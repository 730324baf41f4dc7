//! Tests for FSM AI components.

#[cfg(test)]
mod tests {
    use super::super::fsm::{AIState, AttackVoice, EnemyMobile, MinMaxFloat};

    #[test]
    fn test_ai_state_default() {
        assert_eq!(AIState::default(), AIState::Patrol);
    }

    #[test]
    fn test_enemy_mobile_default() {
        let config = EnemyMobile::default();
        assert_eq!(config.attack_stop_distance_ratio, 0.5);
        assert!(config.random_hit_sparks.is_empty());
        assert!(config.on_attack_voices.is_empty());
        assert_eq!(config.on_detect_sfx, None);
        assert_eq!(config.movement_sound_volume, 1.0);
        assert_eq!(config.pitch_distortion_movement_speed, MinMaxFloat::new(0.8, 1.2));
    }

    #[test]
    fn test_min_max_lerp_clamps() {
        let range = MinMaxFloat::new(1.0, 2.0);
        assert_eq!(range.lerp(0.0), 1.0);
        assert_eq!(range.lerp(0.5), 1.5);
        assert_eq!(range.lerp(1.0), 2.0);

        // За пределами [0, 1] — клампится
        assert_eq!(range.lerp(-3.0), 1.0);
        assert_eq!(range.lerp(7.0), 2.0);
    }

    #[test]
    fn test_attack_voice_default_is_none() {
        assert_eq!(AttackVoice::default().0, None);
    }
}
