use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";

/// Configuration options of the news service, loaded by the `config` crate.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// SQLite database location.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing key, at least 64 bytes.
    pub secret: String,
    /// Glob root of the Tera templates.
    pub templates_dir: String,
    /// Directory holding uploaded attachments, served at `/media`.
    pub media_root: String,
    /// Directory of static assets, served at `/assets`.
    pub static_dir: String,
    /// Where the authentication gate sends anonymous users.
    pub login_url: String,
}

impl ServerConfig {
    /// Layer `config/default.yaml`, `config/{APP_ENV}.yaml` and `APP__*`
    /// environment variables, later sources winning.
    pub fn load(app_env: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));

        if let Some(app_env) = app_env.filter(|env| !env.is_empty()) {
            builder = builder.add_source(File::with_name(&format!("config/{app_env}")).required(false));
        }

        builder
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
