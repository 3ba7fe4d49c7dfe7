use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::path::PathBuf;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations on startup (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
    /// Directory served under `/static` (`STATIC_DIR`, default `static`)
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            run_migrations: env_parse("RUN_MIGRATIONS", true)?,
            static_dir: env_parse("STATIC_DIR", PathBuf::from("static"))?,
        })
    }
}
