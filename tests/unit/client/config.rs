use super::*;

#[test]
fn defaults_match_backend_conventions() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.http_base(), "http://localhost:8188");
    assert_eq!(cfg.completion_timeout(), Duration::from_secs(120));
    assert_eq!(cfg.probe_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    cfg.validate().unwrap();
}

#[test]
fn ws_urls_follow_scheme() {
    let cfg = ClientConfig::new("http://gpu-box:8188/");
    assert_eq!(cfg.ws_base(), "ws://gpu-box:8188");
    assert_eq!(cfg.events_url("abc"), "ws://gpu-box:8188/ws?clientId=abc");

    let tls = ClientConfig::new("https://render.example.com");
    assert_eq!(tls.ws_base(), "wss://render.example.com");
}

#[test]
fn validation_catches_bad_values() {
    assert!(ClientConfig::new("localhost:8188").validate().is_err());
    assert!(
        ClientConfig {
            probe_timeout_ms: 0,
            ..ClientConfig::default()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn completion_timeout_builder() {
    let cfg = ClientConfig::default().with_completion_timeout(Duration::from_millis(250));
    assert_eq!(cfg.completion_timeout_ms, 250);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: ClientConfig =
        serde_json::from_str(r#"{"base_url": "http://10.0.0.2:8188"}"#).unwrap();
    assert_eq!(cfg.base_url, "http://10.0.0.2:8188");
    assert_eq!(cfg.completion_timeout_ms, 120_000);
}
