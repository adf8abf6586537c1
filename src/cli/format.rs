use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::models::{Department, Notification, User};
use crate::repository::SweepReport;

/// Placeholder shown for unset optional fields.
pub const UNSET_LABEL: &str = "-";

/// Long-form timestamp used across the dashboard, e.g.
/// "Saturday, 22. 08. 2026 at 14:03".
pub fn format_timestamp(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(timestamp) => timestamp.format("%A, %d. %m. %Y at %H:%M").to_string(),
        None => UNSET_LABEL.to_string(),
    }
}

fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNSET_LABEL)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            print_json(&json!({ "success": true, "message": message }))
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            Ok(())
        }
    }
}

pub fn print_users(output_format: &OutputFormat, users: &[User]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&users),
        OutputFormat::Text => {
            if users.is_empty() {
                println!("No users");
                return Ok(());
            }
            println!(
                "{:<38} {:<24} {:<18} {:<14} {}",
                "ID", "NAME", "POSITION", "DEPARTMENT", "PHONE"
            );
            for user in users {
                println!(
                    "{:<38} {:<24} {:<18} {:<14} {}",
                    user.id,
                    user.name,
                    label(&user.position),
                    label(&user.department_id),
                    label(&user.phone)
                );
            }
            Ok(())
        }
    }
}

pub fn print_notifications(
    output_format: &OutputFormat,
    notifications: &[Notification],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&notifications),
        OutputFormat::Text => {
            if notifications.is_empty() {
                println!("No notifications");
                return Ok(());
            }
            for notification in notifications {
                let target = if notification.is_global {
                    "everyone".to_string()
                } else {
                    format!("department {}", label(&notification.department_id))
                };
                println!("[{}] {}", notification.id, notification.title);
                println!("  published: {}", format_timestamp(Some(&notification.published_at)));
                println!("  updated:   {}", format_timestamp(notification.updated_at.as_ref()));
                println!("  target:    {}", target);
                println!("  {}", notification.message);
            }
            Ok(())
        }
    }
}

pub fn print_departments(
    output_format: &OutputFormat,
    departments: &[Department],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&departments),
        OutputFormat::Text => {
            if departments.is_empty() {
                println!("No departments");
                return Ok(());
            }
            println!("{:<14} {}", "ID", "NAME");
            for department in departments {
                println!("{:<14} {}", department.id, department.name);
            }
            Ok(())
        }
    }
}

pub fn print_sweep_report(output_format: &OutputFormat, report: &SweepReport) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            if report.is_clean() {
                println!("Join rows are consistent, nothing to repair");
                return Ok(());
            }
            if !report.repaired.is_empty() {
                println!("Repaired: {}", report.repaired.join(", "));
            }
            if !report.unrepairable.is_empty() {
                println!(
                    "Need a manual re-save (no join row left): {}",
                    report.unrepairable.join(", ")
                );
            }
            Ok(())
        }
    }
}
