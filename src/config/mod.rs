// Configuration module entry point
// Loads application configuration and holds shared runtime state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DatabaseConfig, HttpConfig, LoggingConfig, PathsConfig, PerformanceConfig,
    ServerConfig,
};

/// Environment variable naming an alternative config file
const CONFIG_PATH_ENV: &str = "STUDENTS_CONFIG";

impl Config {
    /// Load configuration from `STUDENTS_CONFIG`, or `config.toml` when unset
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: defaults, the file, `APP_*` variables
    /// (`APP_SERVER__PORT=8080`), then `HOST` / `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("performance.keep_alive", true)?
            .set_default("paths.public_dir", "public")?
            .set_default("paths.templates_dir", "templates")?
            .set_default("database.path", "students.db")?
            .set_default("database.seed", true)?
            .set_override_option("server.host", std::env::var("HOST").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the listen address; host names are looked up
    ///
    /// Blocks on DNS, so call it before entering the runtime.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address {}:{}: {e}", self.server.host, self.server.port))?
            .next()
            .ok_or_else(|| {
                format!(
                    "Address {}:{} did not resolve",
                    self.server.host, self.server.port
                )
            })
    }
}
