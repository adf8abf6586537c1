use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::http::Session;

/// Session saved between CLI invocations so `firma users list` does not
/// require a fresh sign-in every time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub user_id: String,
    pub email: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            user_id: session.user_id,
            email: session.email,
            saved_at: Utc::now(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Session {
            access_token: stored.access_token,
            user_id: stored.user_id,
            email: stored.email,
        }
    }
}

/// Get the CLI config directory, creating it if needed.
///
/// Uses FIRMA_CLI_CONFIG_DIR environment variable if set, otherwise
/// defaults to ~/.config/firma/cli.
pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FIRMA_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("firma").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("session.json"))
}

pub fn load_session() -> anyhow::Result<Option<StoredSession>> {
    let path = session_file()?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let stored: StoredSession = serde_json::from_str(&content)?;
    Ok(Some(stored))
}

pub fn save_session(stored: &StoredSession) -> anyhow::Result<()> {
    let path = session_file()?;
    let content = serde_json::to_string_pretty(stored)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn clear_session() -> anyhow::Result<()> {
    let path = session_file()?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_session_round_trips_to_session() {
        let stored = StoredSession {
            access_token: "tok".to_string(),
            user_id: "U1".to_string(),
            email: Some("admin@firma.test".to_string()),
            saved_at: Utc::now(),
        };

        let session: Session = stored.clone().into();
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user_id, "U1");
        assert_eq!(session.email.as_deref(), Some("admin@firma.test"));

        let back = StoredSession::new(session);
        assert_eq!(back.access_token, stored.access_token);
        assert_eq!(back.user_id, stored.user_id);
    }
}
