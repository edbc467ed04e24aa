use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_GEMINI_API_KEY";

/// Main configuration structure for study-ai
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    /// When set, every route except `/health` requires this bearer token
    #[serde(default)]
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Request timeout in seconds, 0 leaves the client without a timeout
    #[serde(default)]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("STUDY_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(Path::new(&config_path));
        config.apply_env_overrides();

        // Validate configuration - log warnings but don't fail
        for warning in config.validate() {
            tracing::warn!("Config validation warning: {} - continuing anyway", warning);
        }

        config
    }

    fn from_file(path: &Path) -> Self {
        if !path.exists() {
            tracing::warn!(
                "Config file not found at {} - using defaults",
                path.display()
            );
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(bind) = env::var("STUDY_HTTP_BIND") {
            self.server.bind = bind;
        }
        if let Ok(token) = env::var("STUDY_BEARER_TOKEN") {
            self.server.bearer_token = if token.is_empty() { None } else { Some(token) };
        }

        // Gemini overrides
        if let Ok(api_key) = env::var("GEMINI_API_KEY").or_else(|_| env::var("API_KEY")) {
            self.gemini.api_key = api_key;
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Ok(timeout) = env::var("GEMINI_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.gemini.timeout_seconds = secs;
            }
        }

        // Theme overrides
        if let Ok(path) = env::var("STUDY_THEME_PATH") {
            self.theme.path = PathBuf::from(path);
        }
    }

    /// Collect validation warnings
    fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.bind.parse::<SocketAddr>().is_err() {
            warnings.push(format!(
                "server.bind '{}' is not a valid host:port",
                self.server.bind
            ));
        }
        if self.gemini.api_key.is_empty() || self.gemini.api_key == PLACEHOLDER_API_KEY {
            warnings.push("GEMINI_API_KEY environment variable must be set".to_string());
        }
        if self.gemini.model.is_empty() {
            warnings.push("gemini.model cannot be empty".to_string());
        }
        if self.gemini.timeout_seconds == 0 {
            warnings.push("gemini.timeout_seconds is 0 - requests will never time out".to_string());
        }

        warnings
    }

    /// Parsed bind address
    pub fn bind_addr(&self) -> crate::error::Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            crate::error::StudyError::Config(format!(
                "Invalid server.bind '{}' (expected host:port): {e}",
                self.server.bind
            ))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:8787".to_string(),
                bearer_token: None,
            },
            gemini: GeminiConfig {
                api_key: PLACEHOLDER_API_KEY.to_string(),
                model: "gemini-2.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                timeout_seconds: 0,
            },
            theme: ThemeConfig {
                path: PathBuf::from(".study-ai-theme.json"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate_only_missing_key_and_timeout() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("GEMINI_API_KEY")));
        assert!(warnings.iter().any(|w| w.contains("timeout_seconds")));
        assert_eq!(
            cfg.bind_addr().expect("default bind parses"),
            "127.0.0.1:8787".parse::<SocketAddr>().expect("literal parses")
        );
    }

    #[test]
    fn test_invalid_bind_is_reported() {
        let mut cfg = Config::default();
        cfg.server.bind = "not-an-address".to_string();
        assert!(cfg.validate().iter().any(|w| w.contains("server.bind")));
        assert!(cfg.bind_addr().is_err());
    }

    #[test]
    fn test_from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "server:\n  bind: 0.0.0.0:9000\ngemini:\n  api_key: abc\n  model: gemini-2.5-pro\n  base_url: http://localhost:1234\n  timeout_seconds: 30\ntheme:\n  path: /tmp/theme.json\n"
        )
        .expect("write yaml");

        let cfg = Config::from_file(file.path());
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert!(cfg.server.bearer_token.is_none());
        assert_eq!(cfg.gemini.api_key, "abc");
        assert_eq!(cfg.gemini.model, "gemini-2.5-pro");
        assert_eq!(cfg.gemini.timeout_seconds, 30);
        assert_eq!(cfg.theme.path, PathBuf::from("/tmp/theme.json"));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn test_from_file_falls_back_on_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "server: [this is not: valid").expect("write yaml");

        let cfg = Config::from_file(file.path());
        assert_eq!(cfg.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = Config::from_file(Path::new("/definitely/not/here/config.yaml"));
        assert_eq!(cfg.server.bind, "127.0.0.1:8787");
    }
}
