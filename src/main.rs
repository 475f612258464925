use std::sync::Arc;

use clap::Parser;
use poem::{EndpointExt, Route, Server, listener::TcpListener, middleware::Tracing};

use dairy_backend::api;
use dairy_backend::app_data::AppData;
use dairy_backend::cli::{self, Cli, Commands};
use dairy_backend::config::{DatabaseConnections, ServerSettings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = ServerSettings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    match cli.command {
        None | Some(Commands::Serve) => serve(settings).await,
        Some(Commands::Migrate) => cli::migrate::run_migrations(&settings).await,
        Some(command) => {
            let app_data = Arc::new(init_app_data(&settings).await?);
            cli::execute_command(command, app_data).await
        }
    }
}

async fn init_app_data(settings: &ServerSettings) -> Result<AppData, Box<dyn std::error::Error>> {
    let connections = DatabaseConnections::init(settings).await?;
    connections.migrate().await?;
    tracing::info!("Database ready");

    Ok(AppData::init(connections).await?)
}

async fn serve(settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let app_data = Arc::new(init_app_data(&settings).await?);

    let api_service = api::api_service(app_data, &format!("{}/api", settings.public_url()));
    let ui = api_service.swagger_ui();

    // API under /api, Swagger UI under /swagger
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(Tracing);

    let address = settings.server_address();
    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", settings.public_url());

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
