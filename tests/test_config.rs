use approx::assert_relative_eq;
use crow_shooter::config::GameConfig;
use crow_shooter::error::GameError;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_relative_eq!(config.spawn_interval_ms, 650.0);
    assert_relative_eq!(config.min_scale, 0.48);
    assert_eq!(config.flyer_sprite.frames, 5);
    assert_eq!(config.impact_sprite.frames, 6);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = GameConfig::from_toml_str("spawn_interval_ms = 500.0\n").unwrap();
    assert_relative_eq!(config.spawn_interval_ms, 500.0);
    assert_relative_eq!(config.reference_width, 1200.0);
    assert_relative_eq!(config.escape_threshold, -50.0);
}

#[test]
fn nested_tables_override_sprites() {
    let text = "[flyer_sprite]\nwidth = 100.0\nheight = 50.0\nframes = 3\n";
    let config = GameConfig::from_toml_str(text).unwrap();
    assert_eq!(config.flyer_sprite.frames, 3);
    assert_relative_eq!(config.flyer_sprite.width, 100.0);
}

#[test]
fn min_scale_out_of_range_is_rejected() {
    let err = GameConfig::from_toml_str("min_scale = 1.5\n").unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn inverted_range_is_rejected() {
    let err = GameConfig::from_toml_str("flyer_size = { min = 0.5, max = 0.2 }\n").unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn zero_frames_is_rejected() {
    let text = "[impact_sprite]\nwidth = 10.0\nheight = 10.0\nframes = 0\n";
    assert!(matches!(
        GameConfig::from_toml_str(text),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = GameConfig::from_toml_str("spawn_interval_ms = \"fast\"").unwrap_err();
    assert!(matches!(err, GameError::Config(_)));
}
