// --- File: crates/bookify_config/src/lib.rs ---
pub mod models;

pub use models::{
    AppConfig, BookingConfig, GcalConfig, MsGraphConfig, ServerConfig, ToolsConfig,
};

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Loads `.env` exactly once for the process.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        if dotenv::dotenv().is_err() {
            tracing::debug!("no .env file found, relying on process environment");
        }
    });
}

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default.yml` (optional)
/// 2. `config/{RUN_ENV}.yml` (optional, `RUN_ENV` defaults to `local`)
/// 3. Environment variables prefixed with `APP`, `__`-separated
///    (e.g. `APP__SERVER__PORT=8086`, `APP__MSGRAPH__CLIENT_ID=...`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "local".to_string());

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    config.try_deserialize()
}
