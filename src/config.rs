use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store_path: Option<String>,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub rest_endpoint: String,
    pub oembed_endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rest_endpoint: "https://api.flickr.com/services/rest/".into(),
            oembed_endpoint: "https://www.flickr.com/services/oembed/".into(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", display(path), e))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| format!("failed to parse config {}: {}", display(path), e))?;
        config.normalize();
        Ok(config)
    }

    /// A missing config file means defaults; an unreadable one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn normalize(&mut self) {
        if let Some(store_path) = &mut self.store_path {
            let trimmed = store_path.trim();
            if trimmed.is_empty() {
                self.store_path = None;
            } else {
                *store_path = trimmed.to_string();
            }
        }
        self.api.normalize();
    }
}

impl ApiConfig {
    fn normalize(&mut self) {
        if self.rest_endpoint.trim().is_empty() {
            self.rest_endpoint = ApiConfig::default().rest_endpoint;
        }
        if self.oembed_endpoint.trim().is_empty() {
            self.oembed_endpoint = ApiConfig::default().oembed_endpoint;
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = 10;
        }
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("fembed.toml")
}
