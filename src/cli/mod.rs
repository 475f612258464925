// CLI module for administrative operations requiring server access

pub mod migrate;
pub mod owner;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::app_data::AppData;

/// Dairy farm backend and administrative CLI
#[derive(Parser)]
#[command(name = "dairy-backend")]
#[command(about = "Dairy farm management backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Run pending database migrations and exit
    Migrate,

    /// Create an account holding the farm owner role
    CreateOwner(CreateOwnerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateOwnerArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// `Male` or `Female`
    #[arg(long)]
    pub sex: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone_number: Option<String>,
}

/// Execute an administrative CLI command
///
/// `Serve` and `Migrate` are handled by `main` before `AppData` exists, so
/// only commands needing the full application data are routed here.
pub async fn execute_command(command: Commands, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::CreateOwner(args) => {
            owner::create_owner(app_data, args).await?;
        }
        Commands::Serve | Commands::Migrate => {
            return Err("serve and migrate are not administrative commands".into());
        }
    }

    Ok(())
}
