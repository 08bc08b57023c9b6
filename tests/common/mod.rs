use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use outreach_chat::api::HttpApi;
use outreach_chat::config::ServerConfig;
use outreach_chat::session::Session;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// `HttpApi` pointed at a mock server, authenticated with `token`
#[allow(dead_code)]
pub fn http_api(base_url: &str, token: &str) -> HttpApi {
    let server = ServerConfig {
        base_url: base_url.to_string(),
        timeout_seconds: Some(5),
    };
    HttpApi::new(&server, Session::new(token)).expect("failed to build http api")
}
