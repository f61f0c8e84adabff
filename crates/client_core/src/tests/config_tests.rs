use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn derives_default_routes_from_base_url() {
    let endpoints = Settings::default().endpoints().expect("endpoints");
    assert_eq!(
        endpoints.create.as_str(),
        "http://127.0.0.1:5000/auth/add_advertisement"
    );
    assert_eq!(
        endpoints.update.as_str(),
        "http://127.0.0.1:5000/auth/update_advertisement"
    );
    assert_eq!(endpoints.delete.as_str(), "http://127.0.0.1:5000/auth/delete_ad");
    assert_eq!(
        endpoints.dashboard.as_str(),
        "http://127.0.0.1:5000/auth/dashboard"
    );
}

#[test]
fn delete_target_appends_record_id_as_path_segment() {
    let endpoints = Settings::default().endpoints().expect("endpoints");
    let target = endpoints
        .delete_target(&RecordId::from(11))
        .expect("delete target");
    assert_eq!(target.as_str(), "http://127.0.0.1:5000/auth/delete_ad/11");
}

#[test]
fn delete_target_handles_trailing_slash_and_escapes_id() {
    let settings = Settings {
        delete_url: Some("https://ads.example.org/remove/".to_string()),
        ..Settings::default()
    };
    let endpoints = settings.endpoints().expect("endpoints");

    let target = endpoints
        .delete_target(&RecordId::from("7"))
        .expect("delete target");
    assert_eq!(target.as_str(), "https://ads.example.org/remove/7");

    let target = endpoints
        .delete_target(&RecordId::from("a/b"))
        .expect("delete target");
    assert_eq!(target.as_str(), "https://ads.example.org/remove/a%2Fb");
}

#[test]
fn delete_target_rejects_opaque_urls() {
    let mut endpoints = Settings::default().endpoints().expect("endpoints");
    endpoints.delete = Url::parse("mailto:ads@example.org").expect("url");

    let err = endpoints
        .delete_target(&RecordId::from(1))
        .expect_err("must fail");
    assert!(matches!(err, SubmissionError::InvalidTarget { .. }));
}

#[test]
fn keeps_base_path_prefix_when_deriving_routes() {
    let base = Url::parse("https://ads.example.org/portal").expect("url");
    let endpoints = Endpoints::from_base(&base).expect("endpoints");
    assert_eq!(
        endpoints.dashboard.as_str(),
        "https://ads.example.org/portal/auth/dashboard"
    );
}

#[test]
fn explicit_urls_override_derived_routes() {
    let settings = Settings {
        create_url: Some("https://other.example.org/ads/new".into()),
        dashboard_url: Some("  ".into()),
        ..Settings::default()
    };
    let endpoints = settings.endpoints().expect("endpoints");
    assert_eq!(endpoints.create.as_str(), "https://other.example.org/ads/new");
    assert_eq!(
        endpoints.dashboard.as_str(),
        "http://127.0.0.1:5000/auth/dashboard"
    );
}

#[test]
fn invalid_override_url_is_reported() {
    let settings = Settings {
        update_url: Some("not a url".into()),
        ..Settings::default()
    };
    let err = settings.endpoints().expect_err("must fail");
    assert!(err.to_string().contains("invalid update url"), "{err}");
}

#[test]
fn file_overrides_accept_strings_and_integers() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
base_url = "https://ads.example.org"
reload_delay_ms = 250
create_encoding = "json"
create_failure_policy = "stay_on_form"
"#,
    )
    .expect("apply");

    assert_eq!(settings.base_url, "https://ads.example.org");
    assert_eq!(settings.reload_delay(), Duration::from_millis(250));
    assert_eq!(settings.create_encoding, BodyEncoding::Json);
    assert_eq!(settings.create_failure_policy, CreateFailurePolicy::StayOnForm);
}

#[test]
fn file_overrides_reject_nested_tables() {
    let mut settings = Settings::default();
    let err = apply_file_overrides(&mut settings, "[routes]\ncreate = \"/x\"\n")
        .expect_err("must fail");
    assert!(err.to_string().contains("unsupported value"), "{err}");
}

#[test]
fn namespaced_env_wins_over_short_alias() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("ADV_BASE_URL", "http://short.example"),
            ("APP__BASE_URL", "http://namespaced.example"),
            ("ADV_REQUEST_TIMEOUT_MS", "1500"),
        ]),
    );
    assert_eq!(settings.base_url, "http://namespaced.example");
    assert_eq!(settings.request_timeout(), Some(Duration::from_millis(1500)));
}

#[test]
fn invalid_env_values_keep_defaults() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("APP__RELOAD_DELAY_MS", "soon"),
            ("APP__CREATE_ENCODING", "xml"),
        ]),
    );
    assert_eq!(settings.reload_delay_ms, 1000);
    assert_eq!(settings.create_encoding, BodyEncoding::Form);
}

#[test]
fn loads_settings_from_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("adv_dashboard_config_test_{suffix}.toml"));
    fs::write(&path, "dashboard_url = \"https://ads.example.org/home\"\n").expect("write");

    let settings = load_settings_from(&path);
    assert_eq!(
        settings.dashboard_url.as_deref(),
        Some("https://ads.example.org/home")
    );

    fs::remove_file(path).expect("cleanup");
}
