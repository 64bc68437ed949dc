use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfo,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Port the listener binds to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL advertised in upload responses; derived from the port
    /// when unset
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded images are stored in
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

fn default_port() -> u16 {
    8000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_url: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// URL prefix used to build the `url` field of upload responses.
    pub fn base_url(&self) -> String {
        match &self.server.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.server.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 9090
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.base_url(), "http://localhost:9090");
    }

    #[test]
    fn test_base_url_override_drops_trailing_slash() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 8000
            base_url = "https://img.example.com/"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://img.example.com");
    }
}
