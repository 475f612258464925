use std::fmt;

use crate::config::{EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://dairy.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, PartialEq, Eq)]
pub enum SettingsError {
    EmptyValue { setting_name: String },
    InvalidPort { value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { setting_name } => {
                write!(f, "Setting '{}' cannot be empty", setting_name)
            }
            Self::InvalidPort { value } => {
                write!(f, "SERVER_PORT must be a number between 1 and 65535, got '{}'", value)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Infrastructure settings read once at startup
pub struct ServerSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    public_url: Option<String>,
}

impl ServerSettings {
    /// Load settings through the given environment provider, falling back to defaults
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(SettingsError::EmptyValue {
                setting_name: "DATABASE_URL".to_string(),
            });
        }

        let server_host = env
            .get_var("SERVER_HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let server_port = match env.get_var("SERVER_PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(SettingsError::InvalidPort { value }),
            },
            None => DEFAULT_PORT,
        };

        let public_url = env.get_var("PUBLIC_URL").filter(|url| !url.is_empty());

        Ok(Self {
            database_url,
            server_host,
            server_port,
            public_url,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// URL advertised in the OpenAPI document
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/api", self.server_port))
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = ServerSettings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), "sqlite://dairy.db?mode=rwc");
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.public_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_values_from_environment() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("PUBLIC_URL", "https://farm.example.com/api"),
        ]);

        let settings = ServerSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "sqlite::memory:");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.public_url(), "https://farm.example.com/api");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = MockEnvironment::empty().with_var("SERVER_PORT", "not-a-port");

        let err = ServerSettings::from_env_provider(&env).unwrap_err();
        assert_eq!(err, SettingsError::InvalidPort { value: "not-a-port".to_string() });
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let env = MockEnvironment::empty().with_var("SERVER_PORT", "0");
        assert!(ServerSettings::from_env_provider(&env).is_err());
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", " ");

        let err = ServerSettings::from_env_provider(&env).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
