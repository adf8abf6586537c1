use clap::Subcommand;

use crate::cli::commands::{load_backend, open_dashboard};
use crate::cli::format;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum NotificationCommands {
    #[command(about = "List notifications, newest first")]
    List,

    #[command(about = "Edit a notification and its department target")]
    Edit {
        #[arg(help = "Notification id")]
        id: String,

        #[arg(long, help = "Title")]
        title: Option<String>,

        #[arg(long, help = "Message body")]
        message: Option<String>,

        #[arg(long, help = "Target everyone (true) or one department (false)")]
        global: Option<bool>,

        #[arg(long, help = "Department id for a department-scoped notification")]
        department: Option<String>,
    },

    #[command(about = "Repair drifted department links for this company")]
    Sweep,
}

pub async fn handle(cmd: NotificationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, backend) = load_backend().await?;
    let dashboard = open_dashboard(&backend).await?;

    match cmd {
        NotificationCommands::List => {
            let mut controller = dashboard.notifications_controller();
            controller.load_list().await;
            format::print_notifications(&output_format, controller.items())
        }

        NotificationCommands::Edit { id, title, message, global, department } => {
            let mut controller = dashboard.notifications_controller();
            controller.load_list().await;
            let index = controller
                .items()
                .iter()
                .position(|notification| notification.id == id)
                .ok_or_else(|| anyhow::anyhow!("notification '{}' not found", id))?;
            controller.open(index);
            controller.edit(|draft| {
                if let Some(title) = &title {
                    draft.changes.title = title.clone();
                }
                if let Some(message) = &message {
                    draft.changes.message = message.clone();
                }
                if let Some(global) = global {
                    draft.changes.is_global = global;
                }
                if let Some(department) = &department {
                    draft.changes.department_id = Some(department.clone());
                }
            });
            controller.save().await?;
            format::print_success(&output_format, &format!("notification '{}' updated", id))
        }

        NotificationCommands::Sweep => {
            let report = dashboard.resolver().sweep(dashboard.scope()).await?;
            format::print_sweep_report(&output_format, &report)
        }
    }
}
