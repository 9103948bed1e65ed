use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use avoidance_kernel::config::AvoiddConfig;
use avoidance_kernel::{AvoidanceDirection, ObjectClass, SteeringMode};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "AVOID_CONFIG",
        "AVOID_ACTUATOR_ADDR",
        "AVOID_CONFIDENCE",
        "AVOID_MIN_AREA",
        "AVOID_CLASSES",
        "AVOID_DEAD_ZONE",
        "AVOID_DIRECTION",
        "AVOID_INTERVAL_MS",
        "AVOID_STEERING_MODE",
        "AVOID_ALLOW_UNTRACKED",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp config");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_config_from_json_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".json",
        r#"{
            "actuator": {
                "addr": "192.168.1.105:12345",
                "min_interval_ms": 250
            },
            "detection": {
                "confidence_threshold": 0.55,
                "min_area": 5000,
                "classes": ["person", "chair", "dog"]
            },
            "avoidance": {
                "dead_zone_fraction": 0.3,
                "direction": "L",
                "allow_untracked_trigger": false
            }
        }"#,
    );

    std::env::set_var("AVOID_CONFIG", file.path());
    std::env::set_var("AVOID_DIRECTION", "R");
    std::env::set_var("AVOID_INTERVAL_MS", "100");
    std::env::set_var("AVOID_ALLOW_UNTRACKED", "true");

    let cfg = AvoiddConfig::load().expect("load config");

    assert_eq!(cfg.actuator.host, "192.168.1.105");
    assert_eq!(cfg.actuator.port, 12345);
    assert_eq!(cfg.engine.confidence_threshold, 0.55);
    assert_eq!(cfg.engine.min_area_threshold, 5000.0);
    assert_eq!(
        cfg.engine.obstacle_classes,
        vec![ObjectClass::Person, ObjectClass::Chair, ObjectClass::Dog]
    );
    assert_eq!(cfg.engine.dead_zone_fraction, 0.3);
    assert_eq!(cfg.engine.avoidance_direction, AvoidanceDirection::Right);
    assert_eq!(cfg.engine.min_interval, Duration::from_millis(100));
    assert_eq!(cfg.engine.steering_mode, SteeringMode::Tracking);
    assert!(cfg.engine.allow_untracked_trigger);

    clear_env();
}

#[test]
fn loads_toml_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".toml",
        r#"
        [actuator]
        addr = "udp://127.0.0.1:4210"

        [avoidance]
        steering_mode = "reactive"
        "#,
    );
    std::env::set_var("AVOID_CONFIG", file.path());
    std::env::set_var("AVOID_CLASSES", "truck, bus");

    let cfg = AvoiddConfig::load().expect("load config");
    assert_eq!(cfg.actuator.addr(), "127.0.0.1:4210");
    assert_eq!(cfg.engine.steering_mode, SteeringMode::Reactive);
    assert_eq!(
        cfg.engine.obstacle_classes,
        vec![ObjectClass::Truck, ObjectClass::Bus]
    );

    clear_env();
}

#[test]
fn defaults_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = AvoiddConfig::load().expect("load config");
    assert_eq!(cfg.actuator.addr(), "192.168.147.27:12345");
    assert_eq!(cfg.engine.dead_zone_fraction, 0.4);
    assert_eq!(cfg.engine.min_interval, Duration::from_millis(200));
    assert_eq!(cfg.engine.avoidance_direction, AvoidanceDirection::Left);
    assert!(!cfg.engine.allow_untracked_trigger);
}

#[test]
fn rejects_malformed_configuration_at_startup() {
    let _guard = ENV_LOCK.lock().unwrap();

    clear_env();
    std::env::set_var("AVOID_DEAD_ZONE", "1.0");
    let err = AvoiddConfig::load().unwrap_err();
    assert!(format!("{:#}", err).contains("dead-zone"), "{:#}", err);

    clear_env();
    std::env::set_var("AVOID_CLASSES", " , ");
    let err = AvoiddConfig::load().unwrap_err();
    assert!(format!("{:#}", err).contains("empty"), "{:#}", err);

    clear_env();
    std::env::set_var("AVOID_CLASSES", "person,toaster");
    assert!(AvoiddConfig::load().is_err());

    clear_env();
    std::env::set_var("AVOID_DIRECTION", "up");
    assert!(AvoiddConfig::load().is_err());

    clear_env();
    std::env::set_var("AVOID_ACTUATOR_ADDR", "esp32-without-port");
    assert!(AvoiddConfig::load().is_err());

    clear_env();
    std::env::set_var("AVOID_INTERVAL_MS", "fast");
    assert!(AvoiddConfig::load().is_err());

    clear_env();
    let file = write_config(".json", r#"{"avoidance": {"dead_zone": 0.2}}"#);
    std::env::set_var("AVOID_CONFIG", file.path());
    assert!(AvoiddConfig::load().is_err());

    clear_env();
}
