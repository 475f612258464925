use crate::config::{DatabaseConnections, ServerSettings};

/// Run database migrations for the farm database
///
/// Connects and migrates without building the full AppData structure.
pub async fn run_migrations(settings: &ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let connections = DatabaseConnections::init(settings).await?;
    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
