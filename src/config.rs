//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding the model, threshold and metric snapshots
    pub artifacts_dir: PathBuf,

    /// Directory holding static model description files
    pub static_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            artifacts_dir: PathBuf::from("artifacts"),
            static_dir: PathBuf::from("static"),
            environment: "development".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            artifacts_dir: env::var("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),

            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            json_logs: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
