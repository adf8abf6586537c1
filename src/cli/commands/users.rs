use clap::Subcommand;

use crate::cli::commands::{confirm, load_backend, open_dashboard};
use crate::cli::format;
use crate::cli::OutputFormat;
use crate::controller::UserDraft;
use crate::models::NewUser;
use crate::repository::DeleteOutcome;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List the company's users")]
    List,

    #[command(about = "Create a user (login identity plus profile row)")]
    Add {
        #[arg(long, help = "Full name")]
        name: String,

        #[arg(long, help = "Login email")]
        email: String,

        #[arg(long, help = "Initial password")]
        password: String,

        #[arg(long, help = "Job position")]
        position: Option<String>,

        #[arg(long, help = "Department id")]
        department: Option<String>,
    },

    #[command(about = "Edit a user's profile")]
    Edit {
        #[arg(help = "User id")]
        id: String,

        #[arg(long, help = "Full name")]
        name: Option<String>,

        #[arg(long, help = "Job position (empty string clears it)")]
        position: Option<String>,

        #[arg(long, help = "Department id (empty string clears it)")]
        department: Option<String>,
    },

    #[command(about = "Remove a user and their login")]
    Remove {
        #[arg(help = "User id")]
        id: String,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, backend) = load_backend().await?;
    let dashboard = open_dashboard(&backend).await?;

    match cmd {
        UserCommands::List => {
            let mut controller = dashboard.users_controller();
            controller.load_list().await;
            format::print_users(&output_format, controller.items())
        }

        UserCommands::Add { name, email, password, position, department } => {
            let mut controller = dashboard.users_controller();
            controller.load_list().await;
            controller.open_blank();
            controller.edit(|draft| {
                *draft = UserDraft::New(NewUser {
                    name: name.clone(),
                    email: email.clone(),
                    password: password.clone(),
                    position: position.clone(),
                    department_id: department.clone(),
                });
            });
            let note = controller.save().await?;
            format::print_success(&output_format, note.as_deref().unwrap_or("user created"))
        }

        UserCommands::Edit { id, name, position, department } => {
            let mut controller = dashboard.users_controller();
            controller.load_list().await;
            let index = controller
                .items()
                .iter()
                .position(|user| user.id == id)
                .ok_or_else(|| anyhow::anyhow!("user '{}' not found", id))?;
            controller.open(index);
            controller.edit(|draft| {
                if let UserDraft::Edit { changes, .. } = draft {
                    if let Some(name) = &name {
                        changes.name = name.clone();
                    }
                    if let Some(position) = &position {
                        changes.position = Some(position.clone());
                    }
                    if let Some(department) = &department {
                        changes.department_id = Some(department.clone());
                    }
                }
            });
            controller.save().await?;
            format::print_success(&output_format, &format!("user '{}' updated", id))
        }

        UserCommands::Remove { id, yes } => {
            let confirmation = confirm(&format!("Remove user '{}' and their login?", id), yes)?;
            let outcome = dashboard.users().delete(dashboard.scope(), &id, confirmation).await?;
            match outcome {
                DeleteOutcome::Deleted => {
                    format::print_success(&output_format, &format!("user '{}' removed", id))
                }
                DeleteOutcome::Cancelled => {
                    println!("Cancelled");
                    Ok(())
                }
            }
        }
    }
}
