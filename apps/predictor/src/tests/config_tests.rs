use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = Settings::default();
    assert_eq!(
        settings.service_endpoint().expect("url").as_str(),
        "http://127.0.0.1:5000/predict"
    );
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "service_url = \"https://predict.example.org/predict\"\nrequest_timeout_secs = 5\n",
    )
    .expect("valid file");
    assert_eq!(settings.service_url, "https://predict.example.org/predict");
    assert_eq!(settings.request_timeout_secs, 5);
}

#[test]
fn file_with_unknown_keys_is_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "bind_addr = \"0.0.0.0\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        lookup_from(&[
            ("PREDICTOR_SERVICE_URL", "http://plain:5000/predict"),
            ("APP__SERVICE_URL", "http://prefixed:5000/predict"),
            ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ]),
    );
    assert_eq!(settings.service_url, "http://prefixed:5000/predict");
    assert_eq!(settings.request_timeout_secs, 12);
}

#[test]
fn non_numeric_timeout_env_is_ignored() {
    let mut settings = Settings::default();
    apply_env(&mut settings, lookup_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]));
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn rejects_non_http_service_urls() {
    let settings = Settings {
        service_url: "ftp://127.0.0.1/predict".to_string(),
        ..Settings::default()
    };
    assert!(settings.service_endpoint().is_err());

    let settings = Settings {
        service_url: "not a url".to_string(),
        ..Settings::default()
    };
    assert!(settings.service_endpoint().is_err());
}

#[test]
fn explicit_config_path_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("plant_predictor_missing_{suffix}.toml"));

    let err = load_settings(&Overrides {
        config_path: Some(missing),
        ..Overrides::default()
    })
    .expect_err("missing explicit config");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn command_line_overrides_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("plant_predictor_cfg_{suffix}.toml"));
    fs::write(
        &path,
        "service_url = \"http://from-file:5000/predict\"\nrequest_timeout_secs = 9\n",
    )
    .expect("write config");

    let settings = load_settings(&Overrides {
        config_path: Some(path.clone()),
        service_url: None,
        timeout_secs: Some(4),
    })
    .expect("load");
    assert_eq!(settings.request_timeout_secs, 4);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn zero_timeout_is_rejected() {
    let err = load_settings(&Overrides {
        config_path: None,
        service_url: None,
        timeout_secs: Some(0),
    })
    .expect_err("zero timeout");
    assert!(err.to_string().contains("at least one second"));
}
