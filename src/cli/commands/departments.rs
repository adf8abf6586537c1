use clap::Subcommand;

use crate::cli::commands::{load_backend, open_dashboard};
use crate::cli::format;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum DepartmentCommands {
    #[command(about = "List the company's departments")]
    List,

    #[command(about = "Rename a department")]
    Edit {
        #[arg(help = "Department id")]
        id: String,

        #[arg(long, help = "New name")]
        name: String,
    },
}

pub async fn handle(cmd: DepartmentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, backend) = load_backend().await?;
    let dashboard = open_dashboard(&backend).await?;

    match cmd {
        DepartmentCommands::List => {
            let mut controller = dashboard.departments_controller();
            controller.load_list().await;
            format::print_departments(&output_format, controller.items())
        }

        DepartmentCommands::Edit { id, name } => {
            let mut controller = dashboard.departments_controller();
            controller.load_list().await;
            let index = controller
                .items()
                .iter()
                .position(|department| department.id == id)
                .ok_or_else(|| anyhow::anyhow!("department '{}' not found", id))?;
            controller.open(index);
            controller.edit(|draft| draft.changes.name = name.clone());
            controller.save().await?;
            format::print_success(
                &output_format,
                &format!("department '{}' renamed to '{}'", id, name),
            )
        }
    }
}
