use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{DatabaseConnections, SecretManager};
use crate::errors::InternalError;
use crate::providers::{
    AuthenticationProvider, CowValidatorProvider, CryptoProvider, HealthValidatorProvider,
    PermissionProvider, ProductionValidatorProvider, ReproductionValidatorProvider, TokenProvider,
    UserValidatorProvider,
};
use crate::stores::{
    CowBreedStore, CowStore, CullingRecordStore, HeatStore, InseminatorStore, LactationStore,
    MilkStore, PregnancyStore, SessionStore, UserStore, WeightRecordStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once at startup and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(connections)
///   ↓ creates once
///   ├─ secret_manager
///   ├─ stores (users, sessions, farm records)
///   └─ providers (crypto, tokens, authentication, permissions, validators)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XCoordinator::new(app_data) → clones the Arcs it needs
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,

    // Stores
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub cow_breed_store: Arc<CowBreedStore>,
    pub cow_store: Arc<CowStore>,
    pub inseminator_store: Arc<InseminatorStore>,
    pub lactation_store: Arc<LactationStore>,
    pub milk_store: Arc<MilkStore>,
    pub weight_record_store: Arc<WeightRecordStore>,
    pub culling_record_store: Arc<CullingRecordStore>,
    pub pregnancy_store: Arc<PregnancyStore>,
    pub heat_store: Arc<HeatStore>,

    // Providers
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub permission_provider: Arc<PermissionProvider>,
    pub user_validator: Arc<UserValidatorProvider>,
    pub cow_validator: Arc<CowValidatorProvider>,
    pub production_validator: Arc<ProductionValidatorProvider>,
    pub health_validator: Arc<HealthValidatorProvider>,
    pub reproduction_validator: Arc<ReproductionValidatorProvider>,
}

impl AppData {
    /// Initialize all application data, reading secrets from the environment
    ///
    /// Database connections should be initialized and migrated before calling this.
    pub async fn init(connections: DatabaseConnections) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = SecretManager::init()
            .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?;
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_secret_manager(connections, Arc::new(secret_manager));
        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Build application data around an already loaded secret manager
    pub fn with_secret_manager(connections: DatabaseConnections, secret_manager: Arc<SecretManager>) -> Self {
        let db = connections.farm.clone();

        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new());
        let session_store = Arc::new(SessionStore::new());

        tracing::debug!("Creating providers...");
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone(), crypto_provider.clone()));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            user_store.clone(),
            session_store.clone(),
            crypto_provider.clone(),
            token_provider.clone(),
        ));

        Self {
            connections,
            db,
            secret_manager,
            user_store,
            session_store,
            cow_breed_store: Arc::new(CowBreedStore::new()),
            cow_store: Arc::new(CowStore::new()),
            inseminator_store: Arc::new(InseminatorStore::new()),
            lactation_store: Arc::new(LactationStore::new()),
            milk_store: Arc::new(MilkStore::new()),
            weight_record_store: Arc::new(WeightRecordStore::new()),
            culling_record_store: Arc::new(CullingRecordStore::new()),
            pregnancy_store: Arc::new(PregnancyStore::new()),
            heat_store: Arc::new(HeatStore::new()),
            crypto_provider,
            token_provider,
            authentication_provider,
            permission_provider: Arc::new(PermissionProvider::new()),
            user_validator: Arc::new(UserValidatorProvider::new()),
            cow_validator: Arc::new(CowValidatorProvider::new()),
            production_validator: Arc::new(ProductionValidatorProvider::new()),
            health_validator: Arc::new(HealthValidatorProvider::new()),
            reproduction_validator: Arc::new(ReproductionValidatorProvider::new()),
        }
    }
}
