// Providers layer - Work performers and business logic
//
// Providers contain the rules and building blocks that coordinators
// orchestrate: hashing, tokens, permission checks and the farm record
// validations. Validators are pure; the coordinator fetches what they need.

pub mod authentication_provider;
pub mod cow_validator_provider;
pub mod crypto_provider;
pub mod field_rules;
pub mod health_validator_provider;
pub mod permission_provider;
pub mod production_validator_provider;
pub mod reproduction_validator_provider;
pub mod token_provider;
pub mod user_validator_provider;

// Re-export providers for clean imports
pub use authentication_provider::AuthenticationProvider;
pub use cow_validator_provider::CowValidatorProvider;
pub use crypto_provider::CryptoProvider;
pub use health_validator_provider::HealthValidatorProvider;
pub use permission_provider::{ALL_STAFF, MANAGEMENT, Permission, PermissionProvider};
pub use production_validator_provider::ProductionValidatorProvider;
pub use reproduction_validator_provider::ReproductionValidatorProvider;
pub use token_provider::TokenProvider;
pub use user_validator_provider::UserValidatorProvider;
