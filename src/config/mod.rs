use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

/// Connection settings for the hosted backend (REST, auth and functions
/// endpoints all hang off the same project URL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    /// No request timeout unless configured; a hung call stalls only the
    /// interaction that issued it.
    pub http_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend: BackendConfig {
                url: env::var("FIRMA_BACKEND_URL").unwrap_or_default(),
                anon_key: env::var("FIRMA_BACKEND_KEY").unwrap_or_default(),
                http_timeout_secs: env::var("FIRMA_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
