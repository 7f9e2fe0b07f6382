use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.storage.namespace, "maskedElements");
    assert_eq!(config.storage.settings_key, "maskSettings");
    assert_eq!(config.observer.debounce_ms, 500);
    assert!(config.observer.early_hide);
    assert_eq!(config.history.limit, 50);
}

#[test]
fn test_render_config_default() {
    let render = RenderConfig::default();
    assert_eq!(render.background_search_depth, 10);
    assert_eq!(render.blur_radius_px, 10);
    assert_eq!(render.fallback_color, "#808080");
    assert_eq!(render.default_font_size_px, 14);
    assert_eq!(render.image_timeout(), Duration::from_secs(10));
}

#[test]
fn test_default_paths_live_under_spyweb_home() {
    let storage = StorageConfig::default();
    assert!(storage.path.ends_with(".spyweb/storage"));
    assert!(Config::default_path().ends_with(".spyweb/config.toml"));
    assert!(LoggingConfig::default().log_dir().ends_with(".spyweb/logs"));
}

#[test]
fn test_observer_debounce_duration() {
    let observer = ObserverConfig {
        debounce_ms: 250,
        early_hide: false,
    };
    assert_eq!(observer.debounce(), Duration::from_millis(250));
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: Config = toml::from_str(
        r#"
        [render]
        blur_radius_px = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.render.blur_radius_px, 4);
    assert_eq!(config.render.fallback_color, "#808080");
    assert_eq!(config.history.limit, 50);
}

#[test]
fn test_config_serialize_round_trip() {
    let mut config = Config::default();
    config.logging.dir = Some(PathBuf::from("/tmp/spyweb-logs"));
    let text = toml::to_string(&config).unwrap();
    let back: Config = toml::from_str(&text).unwrap();
    assert_eq!(back.logging.dir, config.logging.dir);
    assert_eq!(back.storage.path, config.storage.path);
}
