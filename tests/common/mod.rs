use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tutorchat::config::GatewayConfig;
use tutorchat::HttpGateway;

#[allow(dead_code)]
pub fn gateway_for(uri: &str) -> HttpGateway {
    let config = GatewayConfig {
        base_url: uri.to_string(),
        timeout_seconds: Some(5),
    };
    HttpGateway::new(&config).expect("failed to build gateway")
}

#[allow(dead_code)]
pub fn message_json(id: &str, text: &str, sender: &str, timestamp: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "sender": sender,
        "timestamp": timestamp,
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_profile_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join("profile.yaml");
    (temp_dir, path)
}
