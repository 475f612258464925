pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_schema;
mod m20250301_000002_create_core_schema;
mod m20250301_000003_create_reproduction_schema;
mod m20250301_000004_create_production_schema;
mod m20250301_000005_create_health_schema;

/// Migrator for the farm database.
///
/// Reproduction runs before production because lactations reference
/// the pregnancy that started them.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_schema::Migration),
            Box::new(m20250301_000002_create_core_schema::Migration),
            Box::new(m20250301_000003_create_reproduction_schema::Migration),
            Box::new(m20250301_000004_create_production_schema::Migration),
            Box::new(m20250301_000005_create_health_schema::Migration),
        ]
    }
}
