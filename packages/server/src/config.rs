use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Page sizing applied to `GET /api/blogs`.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// Directory for `app.log`. Blank disables file output.
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub log: LogConfig,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 5,
            max_per_page: 100,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Environment::with_prefix("BLOG")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors.allow_origins")
                .with_list_parse_key("server.cors.allow_methods")
                .with_list_parse_key("server.cors.allow_headers")
                .try_parsing(true),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    fn build(env: Environment, database_url: Option<String>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default(
                "server.cors.allow_origins",
                vec!["http://localhost:3000", "http://127.0.0.1:3000"],
            )?
            .set_default(
                "server.cors.allow_methods",
                vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"],
            )?
            .set_default(
                "server.cors.allow_headers",
                vec!["Content-Type", "Authorization"],
            )?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.max_connections", 10)?
            .set_default("pagination.default_per_page", 5)?
            .set_default("pagination.max_per_page", 100)?
            .set_default("log.level", "info")?
            .set_default("log.dir", "logs")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., BLOG__SERVER__PORT)
            .add_source(env)
            // The conventional DATABASE_URL wins over everything else
            .set_override_option("database.url", database_url.filter(|u| !u.trim().is_empty()))?
            .build()?;

        match s.get_string("database.url") {
            Ok(url) if !url.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::NotFound(
                    "DATABASE_URL is missing from environment variables".into(),
                ));
            }
        }

        s.try_deserialize()
    }
}
