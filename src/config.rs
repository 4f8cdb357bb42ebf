use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a request body, uploads included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    /// Side length of the square input the classifier expects.
    pub image_size: u32,
    /// Must follow the classifier's output ordering.
    pub class_names: Vec<String>,
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "my_model.onnx".to_string(),
            image_size: 300,
            class_names: ["Healthy", "Disease1", "Disease2", "Disease3"]
                .into_iter()
                .map(String::from)
                .collect(),
            intra_threads: 4,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploads are written to and served from.
    pub static_dir: String,
    pub url_prefix: String,
    pub filename_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_string(),
            url_prefix: "/static".to_string(),
            filename_prefix: "wheat".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the YAML config at `path`, or returns the built-in defaults
    /// when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = AppConfig::default();
        assert_eq!(config.model.path, "my_model.onnx");
        assert_eq!(config.model.image_size, 300);
        assert_eq!(
            config.model.class_names,
            vec!["Healthy", "Disease1", "Disease2", "Disease3"]
        );
        assert_eq!(config.storage.static_dir, "static");
        assert_eq!(config.storage.url_prefix, "/static");
        assert_eq!(config.storage.filename_prefix, "wheat");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            r#"
server:
  port: 9000
model:
  class_names: ["Healthy", "Rust"]
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.class_names, vec!["Healthy", "Rust"]);
        assert_eq!(config.model.path, "my_model.onnx");
        assert_eq!(config.storage.static_dir, "static");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.model.image_size, 300);
    }

    #[test]
    fn test_example_config_parses() {
        let config = AppConfig::from_yaml(include_str!("../config.example.yaml")).unwrap();
        assert_eq!(config.server.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.model.class_names.len(), 4);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("server: [not, a, map]").is_err());
    }
}
