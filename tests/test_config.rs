use std::collections::HashMap;

use htserve::config::{CONFIG_ENV, Config};

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::load_with(env(&[])).unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8888");
    assert_eq!(cfg.server.read_buffer_size, 1024);
    assert_eq!(cfg.server.max_body_size, 1024 * 1024);
    assert_eq!(cfg.server.max_head_size, 8 * 1024);
    assert_eq!(cfg.server.max_uri_len, 2 * 1024);
    assert!(cfg.server.keep_alive);
    assert_eq!(cfg.log_level().unwrap(), tracing::Level::INFO);
}

#[test]
fn test_config_listen_override() {
    let cfg = Config::load_with(env(&[("LISTEN", "0.0.0.0:3000")])).unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
}

#[test]
fn test_config_log_level_override() {
    let cfg = Config::load_with(env(&[("LOG_LEVEL", "debug")])).unwrap();
    assert_eq!(cfg.log_level().unwrap(), tracing::Level::DEBUG);

    assert!(Config::load_with(env(&[("LOG_LEVEL", "loud")])).is_err());
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml_str(
        r#"
server:
  listen_addr: "127.0.0.1:9000"
  keep_alive: false
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9000");
    assert!(!cfg.server.keep_alive);
    assert_eq!(cfg.server.read_buffer_size, 1024);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn test_config_head_limits_from_yaml() {
    let cfg = Config::from_yaml_str("server:\n  max_head_size: 512\n  max_uri_len: 64\n").unwrap();
    assert_eq!(cfg.server.max_head_size, 512);
    assert_eq!(cfg.server.max_uri_len, 64);

    assert!(Config::from_yaml_str("server:\n  max_head_size: 0\n").is_err());
    assert!(Config::from_yaml_str("server:\n  max_uri_len: 0\n").is_err());
}

#[test]
fn test_config_rejects_zero_buffer() {
    let result = Config::from_yaml_str("server:\n  read_buffer_size: 0\n");
    assert!(result.is_err());
}

#[test]
fn test_config_file_then_env() {
    let path = std::env::temp_dir().join(format!("htserve-test-{}.yaml", std::process::id()));
    std::fs::write(
        &path,
        "server:\n  listen_addr: \"127.0.0.1:7000\"\n  max_body_size: 10\nlog_level: warn\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().into_owned();

    let from_file = Config::load_with(env(&[(CONFIG_ENV, path_str.as_str())])).unwrap();
    assert_eq!(from_file.server.listen_addr, "127.0.0.1:7000");
    assert_eq!(from_file.server.max_body_size, 10);
    assert_eq!(from_file.log_level().unwrap(), tracing::Level::WARN);

    let overridden =
        Config::load_with(env(&[(CONFIG_ENV, path_str.as_str()), ("LISTEN", "127.0.0.1:7001")])).unwrap();
    assert_eq!(overridden.server.listen_addr, "127.0.0.1:7001");
    assert_eq!(overridden.server.max_body_size, 10);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_missing_file_is_error() {
    let err = Config::load_with(env(&[(CONFIG_ENV, "/nonexistent/htserve.yaml")])).unwrap_err();
    assert!(err.to_string().contains("reading config file"));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}
