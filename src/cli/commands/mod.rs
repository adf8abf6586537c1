pub mod auth;
pub mod departments;
pub mod notifications;
pub mod users;

use std::io::Write;
use std::sync::Arc;

use crate::backend::{Backend, HttpBackend};
use crate::cli::config as cli_config;
use crate::config;
use crate::dashboard::Dashboard;
use crate::error::Redirect;
use crate::repository::Confirmation;

/// Build the HTTP backend from environment configuration and adopt any
/// session a previous invocation left behind.
pub(crate) async fn load_backend() -> anyhow::Result<(Arc<HttpBackend>, Backend)> {
    let http = Arc::new(HttpBackend::new(&config::config().backend)?);
    if let Some(stored) = cli_config::load_session()? {
        http.restore_session(stored.into()).await;
    }
    let backend = Backend {
        identity: http.clone(),
        rows: http.clone(),
        functions: http.clone(),
    };
    Ok((http, backend))
}

/// Run the admission checks and hand back a ready dashboard, turning
/// redirects into actionable CLI errors.
pub(crate) async fn open_dashboard(backend: &Backend) -> anyhow::Result<Dashboard> {
    match Dashboard::initialize(backend.clone()).await {
        Ok(dashboard) => Ok(dashboard),
        Err(err) => {
            let hint = match err.redirect() {
                Some(Redirect::Login) => "; sign in with `firma auth login`",
                Some(Redirect::Error) => "; this account is not linked to a company",
                None => "",
            };
            if err.redirect().is_some() {
                // The guard already invalidated the session remotely.
                let _ = cli_config::clear_session();
            }
            Err(anyhow::anyhow!("{}{}", err, hint))
        }
    }
}

/// Explicit confirmation prompt; only a literal "yes" confirms.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Confirmed);
    }

    print!("{} Type 'yes' to confirm: ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    if answer.trim() == "yes" {
        Ok(Confirmation::Confirmed)
    } else {
        Ok(Confirmation::Declined)
    }
}

/// Password from the flag when given, prompted from stdin otherwise.
pub(crate) fn read_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    print!("Password: ");
    std::io::stdout().flush()?;

    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    Ok(password.trim().to_string())
}
