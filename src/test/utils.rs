// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};

use crate::app_data::AppData;
use crate::config::{DatabaseConnections, MockEnvironment, SecretManager};
use crate::stores::{CowBreedStore, CowStore, NewCow, NewUser, UserStore};
use crate::types::db::{cow, user};
use crate::types::internal::auth::{Claims, RoleFlags};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-minimum-32-chars";

/// In-memory SQLite database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// SecretManager loaded from fixed test secrets, without touching the process env
pub fn test_secret_manager() -> Arc<SecretManager> {
    let env = MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PEPPER", TEST_PEPPER),
        ("REFRESH_TOKEN_SECRET", TEST_REFRESH_SECRET),
    ]);
    Arc::new(SecretManager::init_with(&env).expect("Failed to initialize test SecretManager"))
}

/// Full application data over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::with_secret_manager(
        DatabaseConnections::from_connection(db),
        test_secret_manager(),
    ))
}

/// A user row that was never stored, for token tests
pub fn sample_user(id: i32, username: &str) -> user::Model {
    user::Model {
        id,
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone_number: None,
        sex: "Female".to_string(),
        password_hash: String::new(),
        is_farm_owner: false,
        is_farm_manager: false,
        is_assistant_farm_manager: false,
        is_team_leader: false,
        is_farm_worker: false,
        created_at: 0,
        updated_at: 0,
    }
}

/// Insert payload for a user with no roles and a throwaway hash
pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone_number: None,
        sex: "Male".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        roles: RoleFlags::default(),
    }
}

/// Store a user whose password hash verifies against `password`
pub async fn create_user_with_password(app_data: &AppData, username: &str, password: &str) -> user::Model {
    let password_hash = app_data
        .crypto_provider
        .hash_password(password)
        .await
        .expect("Failed to hash password");

    UserStore::new()
        .insert(
            &app_data.db,
            NewUser {
                password_hash,
                ..new_user(username)
            },
        )
        .await
        .expect("Failed to create test user")
}

/// Store a user holding `roles`
pub async fn create_user_with_roles(app_data: &AppData, username: &str, roles: RoleFlags) -> user::Model {
    UserStore::new()
        .insert(&app_data.db, NewUser { roles, ..new_user(username) })
        .await
        .expect("Failed to create test user")
}

/// Claims as a freshly issued token would carry them
pub fn claims_for(user_id: i32, roles: RoleFlags) -> Claims {
    Claims {
        sub: user_id.to_string(),
        exp: i64::MAX,
        iat: 0,
        jti: format!("session-{}", user_id),
        is_farm_owner: roles.is_farm_owner,
        is_farm_manager: roles.is_farm_manager,
        is_assistant_farm_manager: roles.is_assistant_farm_manager,
        is_team_leader: roles.is_team_leader,
        is_farm_worker: roles.is_farm_worker,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// An open, alive milking cow that was never stored
pub fn cow_model(id: i32, gender: &str, date_of_birth: NaiveDate) -> cow::Model {
    cow::Model {
        id,
        name: format!("Cow {}", id),
        breed_id: 1,
        date_of_birth,
        gender: gender.to_string(),
        availability_status: "Alive".to_string(),
        current_pregnancy_status: "Open".to_string(),
        category: "Milking Cow".to_string(),
        current_production_status: "Open".to_string(),
        is_bought: false,
        date_introduced_in_farm: date_of_birth,
        date_of_death: None,
        sire_id: None,
        dam_id: None,
    }
}

/// Store an open, alive cow, creating its breed when needed
pub async fn insert_cow(
    db: &DatabaseConnection,
    name: &str,
    breed: &str,
    gender: &str,
    date_of_birth: NaiveDate,
) -> cow::Model {
    let breed = CowBreedStore::new()
        .get_or_create(db, breed)
        .await
        .expect("Failed to create breed");

    CowStore::new()
        .insert(
            db,
            NewCow {
                name: name.to_string(),
                breed_id: breed.id,
                date_of_birth,
                gender: gender.to_string(),
                availability_status: "Alive".to_string(),
                current_pregnancy_status: "Open".to_string(),
                category: "Milking Cow".to_string(),
                current_production_status: "Open".to_string(),
                is_bought: false,
                date_introduced_in_farm: date_of_birth,
                date_of_death: None,
                sire_id: None,
                dam_id: None,
            },
        )
        .await
        .expect("Failed to insert cow")
}
