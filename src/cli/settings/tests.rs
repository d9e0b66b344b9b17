use super::*;
use crate::core::config::Config;
use crate::utils::test_utils::test_catalog;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn set(key: &str, values: &[&str], config: &mut Config) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let catalog = test_catalog();
    let handler = registry.get(key).expect("registered key");
    let mut ctx = SetContext {
        config,
        catalog: &catalog,
    };
    handler.set(&args(values), &mut ctx)
}

fn unset(key: &str, config: &mut Config) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let catalog = test_catalog();
    let handler = registry.get(key).expect("registered key");
    let mut ctx = SetContext {
        config,
        catalog: &catalog,
    };
    handler.unset(&mut ctx)
}

#[test]
fn registry_lists_every_config_key_in_order() {
    let registry = SettingRegistry::new();
    assert_eq!(
        registry.keys_display_order(),
        &[
            "default-model",
            "theme",
            "endpoint",
            "markdown",
            "request-timeout",
            "reveal-interval"
        ]
    );
    assert!(registry.get("default-provider").is_none());
}

#[test]
fn default_model_must_exist_in_catalog() {
    let mut config = Config::default();
    let message = set("default-model", &["m2"], &mut config).expect("known model");
    assert!(message.contains("Model Two"));
    assert_eq!(config.default_model.as_deref(), Some("m2"));

    let err = set("default-model", &["nope"], &mut config).expect_err("unknown model");
    assert!(matches!(err, SettingError::UnknownModel { .. }));
    assert_eq!(config.default_model.as_deref(), Some("m2"));

    unset("default-model", &mut config).expect("unset");
    assert!(config.default_model.is_none());
}

#[test]
fn theme_accepts_light_and_dark_only() {
    let mut config = Config::default();
    set("theme", &["Dark"], &mut config).expect("dark");
    assert_eq!(config.theme.as_deref(), Some("dark"));

    let err = set("theme", &["solarized"], &mut config).expect_err("unknown theme");
    assert!(matches!(err, SettingError::UnknownTheme { .. }));
    assert_eq!(config.theme.as_deref(), Some("dark"));
}

#[test]
fn endpoint_is_validated_and_normalized() {
    let mut config = Config::default();
    set("endpoint", &["http://proxy.local:8080/"], &mut config).expect("valid url");
    assert_eq!(config.endpoint.as_deref(), Some("http://proxy.local:8080"));

    let err = set("endpoint", &["proxy.local"], &mut config).expect_err("missing scheme");
    assert!(matches!(
        err,
        SettingError::InvalidValue {
            key: "endpoint",
            ..
        }
    ));
}

#[test]
fn markdown_parses_booleans() {
    let mut config = Config::default();
    set("markdown", &["off"], &mut config).expect("off");
    assert_eq!(config.markdown, Some(false));
    assert!(matches!(
        set("markdown", &["maybe"], &mut config),
        Err(SettingError::InvalidBoolean(_))
    ));
    unset("markdown", &mut config).expect("unset");
    assert_eq!(config.markdown, None);
}

#[test]
fn numeric_settings_reject_zero_and_garbage() {
    let mut config = Config::default();
    set("request-timeout", &["90"], &mut config).expect("seconds");
    assert_eq!(config.request_timeout_secs, Some(90));
    set("reveal-interval", &["15"], &mut config).expect("millis");
    assert_eq!(config.reveal_interval_ms, Some(15));

    for bad in ["0", "-3", "fast"] {
        assert!(matches!(
            set("reveal-interval", &[bad], &mut config),
            Err(SettingError::InvalidValue { .. })
        ));
    }
    assert_eq!(config.reveal_interval_ms, Some(15));
}

#[test]
fn missing_value_is_reported_with_an_example() {
    let mut config = Config::default();
    match set("request-timeout", &[], &mut config) {
        Err(SettingError::MissingArgs { example, .. }) => {
            assert!(example.starts_with("parley set request-timeout"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn format_shows_defaults_for_unset_keys() {
    let registry = SettingRegistry::new();
    let config = Config::default();
    let timeout = registry
        .get("request-timeout")
        .expect("registered")
        .format(&config);
    assert_eq!(timeout, "  request-timeout: (unset, default: 60 s)");
    let theme = registry.get("theme").expect("registered").format(&config);
    assert_eq!(theme, "  theme: (unset, default: light)");
}
