use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of a session token in days. Default: 7.
    #[serde(default = "default_token_days")]
    pub token_days: i64,
    /// Name of the cookie carrying the session token. Default: "shelter_session".
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Where anonymous visitors are sent when a page needs a login. Default: "/accounts/login/".
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

fn default_token_days() -> i64 {
    7
}
fn default_cookie_name() -> String {
    "shelter_session".into()
}
fn default_login_url() -> String {
    "/accounts/login/".into()
}

impl AuthConfig {
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_days: default_token_days(),
            cookie_name: default_cookie_name(),
            login_url: default_login_url(),
        }
    }
}

/// Optional superuser created on startup when it does not exist yet.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BootstrapConfig {
    pub superuser_username: Option<String>,
    pub superuser_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("SHELTER_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://shelter.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., SHELTER__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SHELTER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
