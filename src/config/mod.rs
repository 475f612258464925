mod database;
mod env_provider;
mod logging;
mod secret_config;
mod secret_manager;
mod server_settings;

pub use database::DatabaseConnections;
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
pub use server_settings::{ServerSettings, SettingsError};
