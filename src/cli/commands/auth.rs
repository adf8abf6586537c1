use clap::Subcommand;

use crate::cli::commands::{load_backend, open_dashboard, read_password};
use crate::cli::config as cli_config;
use crate::cli::format;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and verify admin access")]
    Login {
        #[arg(help = "Email address")]
        email: String,

        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the saved session")]
    Logout,

    #[command(about = "Show the signed-in admin and company scope")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = read_password(password)?;
            let (http, backend) = load_backend().await?;

            let principal = backend
                .identity
                .sign_in(&email, &password)
                .await
                .map_err(|err| anyhow::anyhow!("sign-in failed: {}", err))?;

            let session = http
                .session()
                .await
                .ok_or_else(|| anyhow::anyhow!("sign-in left no session behind"))?;
            cli_config::save_session(&cli_config::StoredSession::new(session))?;

            // Admission checks run immediately so a non-admin account is
            // turned away at the door, not on the first data command.
            let dashboard = open_dashboard(&backend).await?;
            format::print_success(
                &output_format,
                &format!(
                    "signed in as {} ({} admin of company {})",
                    principal.email.as_deref().unwrap_or(&principal.user_id),
                    dashboard.scope().role().as_str(),
                    dashboard.scope().company_id()
                ),
            )?;

            // The dashboard greets with the user list.
            let mut controller = dashboard.users_controller();
            controller.load_list().await;
            format::print_users(&output_format, controller.items())
        }

        AuthCommands::Logout => {
            let (_, backend) = load_backend().await?;
            if let Err(err) = backend.identity.sign_out().await {
                tracing::warn!("remote sign-out failed: {}", err);
            }
            cli_config::clear_session()?;
            format::print_success(&output_format, "signed out")
        }

        AuthCommands::Whoami => {
            let (_, backend) = load_backend().await?;
            let dashboard = open_dashboard(&backend).await?;
            let scope = dashboard.scope();
            match output_format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "admin_id": scope.admin_id(),
                        "company_id": scope.company_id(),
                        "role": scope.role().as_str(),
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Text => {
                    println!("Admin:   {}", scope.admin_id());
                    println!("Company: {}", scope.company_id());
                    println!("Role:    {}", scope.role().as_str());
                }
            }
            Ok(())
        }
    }
}
