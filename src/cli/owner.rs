// Owner account creation from the command line

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::cli::CreateOwnerArgs;
use crate::coordinators::UserCoordinator;
use crate::providers::{CryptoProvider, UserValidatorProvider};
use crate::types::dto::user::RegisterRequest;
use crate::types::internal::auth::RoleFlags;
use crate::types::internal::context::RequestContext;

/// Create a user holding the farm owner role
///
/// The password is either generated or typed in at the prompt. A generated
/// password is printed once and never stored in clear.
pub async fn create_owner(app_data: Arc<AppData>, args: CreateOwnerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create_owner");
    tracing::info!(actor = %ctx.actor_id, username = %args.username, "CLI session started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let (password, generated) = prompt_for_password(
        &mut stdin.lock(),
        &mut stdout,
        &app_data.crypto_provider,
        &app_data.user_validator,
    )?;

    let coordinator = UserCoordinator::new(app_data.clone());
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        phone_number: args.phone_number,
        sex: args.sex,
        password: password.clone(),
    };
    let roles = RoleFlags {
        is_farm_owner: true,
        ..Default::default()
    };

    let owner = match coordinator.create_user(&ctx, request, roles).await {
        Ok(owner) => owner,
        Err(e) => {
            tracing::warn!(actor = %ctx.actor_id, error = %e, "Owner creation failed");
            println!("❌ Error: {}", e);
            return Err(e.into());
        }
    };

    println!("\n✓ Farm owner account created");
    println!("  ID: {}", owner.id);
    println!("  Username: {}", owner.username);
    if generated {
        println!("  Password: {}", password);
        println!("  ⚠️  Store this password now, it will not be shown again");
    }

    tracing::info!(actor = %ctx.actor_id, user_id = owner.id, "CLI session finished");
    Ok(())
}

/// Ask whether to generate the owner's password or read one in
///
/// Returns the password and whether it was generated.
fn prompt_for_password(
    input: &mut impl BufRead,
    output: &mut impl Write,
    crypto_provider: &CryptoProvider,
    user_validator: &UserValidatorProvider,
) -> Result<(String, bool), Box<dyn std::error::Error>> {
    loop {
        // ANSI codes: \x1b[1m = bold, \x1b[36m = cyan, \x1b[0m = reset
        write!(output, "Generate password automatically? (\x1b[1m\x1b[36mY\x1b[0m/n) [default: Y]: ")?;
        output.flush()?;

        let choice = read_trimmed(input)?.to_lowercase();
        match choice.as_str() {
            "" | "y" | "yes" => {
                writeln!(output, "✓ Password auto-generated")?;
                return Ok((crypto_provider.generate_secure_password(), true));
            }
            "n" | "no" => loop {
                write!(output, "Enter password: ")?;
                output.flush()?;

                let password = read_trimmed(input)?;
                match user_validator.validate_password(&password) {
                    Ok(()) => return Ok((password, false)),
                    Err(e) => writeln!(output, "❌ {}", e)?,
                }
            },
            _ => writeln!(output, "Please answer y or n")?,
        }
    }
}

fn read_trimmed(input: &mut impl BufRead) -> Result<String, Box<dyn std::error::Error>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("standard input closed".into());
    }
    Ok(line.trim().to_string())
}
