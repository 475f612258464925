// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dairy_backend::app_data::AppData;
use dairy_backend::config::{DatabaseConnections, EnvironmentProvider, SecretManager};
use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};

/// Creates an in-memory farm database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run farm migrations");

    db
}

/// Fixed environment for building secrets without touching the process env
pub struct StaticEnvironment(HashMap<&'static str, &'static str>);

impl StaticEnvironment {
    pub fn with_test_secrets() -> Self {
        Self(HashMap::from([
            ("JWT_SECRET", "integration-jwt-secret-at-least-32-chars"),
            ("PEPPER", "integration-pepper"),
            ("REFRESH_TOKEN_SECRET", "integration-refresh-secret-32-characters"),
        ]))
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }
}

/// Application data over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = SecretManager::init_with(&StaticEnvironment::with_test_secrets())
        .expect("Failed to load test secrets");

    Arc::new(AppData::with_secret_manager(
        DatabaseConnections::from_connection(db),
        Arc::new(secret_manager),
    ))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        // Clean up before setting new values
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
