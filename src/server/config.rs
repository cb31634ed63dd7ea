//! Server configuration types
//!
//! Contains all configuration structures for the Atelier server.

use atelier_canvas::compositor::{DEFAULT_HEIGHT, DEFAULT_MAX_DIMENSION, DEFAULT_WIDTH};
use atelier_canvas::CanvasSettings;
use atelier_social::SuggestionConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Canvas session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Width of new canvases
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height of new canvases
    #[serde(default = "default_height")]
    pub height: u32,
    /// Upper bound for either dimension
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Open sessions allowed per user
    #[serde(default = "default_max_sessions_per_user")]
    pub max_sessions_per_user: usize,
    /// Idle time before a session is dropped
    #[serde(default = "default_max_idle_secs")]
    pub max_idle_secs: i64,
    /// How often idle sessions are swept
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_max_sessions_per_user() -> usize {
    10
}

fn default_max_idle_secs() -> i64 {
    3600
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_dimension: default_max_dimension(),
            max_sessions_per_user: default_max_sessions_per_user(),
            max_idle_secs: default_max_idle_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl CanvasConfig {
    /// Compositor settings for new sessions
    pub fn settings(&self) -> CanvasSettings {
        CanvasSettings {
            width: self.width,
            height: self.height,
            max_dimension: self.max_dimension,
            ..CanvasSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::loader::DEFAULT_CONFIG;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8090);
        assert_eq!(config.canvas.width, 1400);
        assert_eq!(config.canvas.height, 800);
        assert_eq!(config.suggestions.limit, 4);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_canvas_settings_keep_default_brush() {
        let settings = CanvasConfig::default().settings();
        assert_eq!(settings.width, 1400);
        assert_eq!(settings.brush, CanvasSettings::default().brush);
    }
}
