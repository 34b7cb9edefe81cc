//! Admin password check.
//!
//! # Environment Variables
//!
//! - `ADMIN_PASSWORD` - the configured admin password
//! - `SESSION_SECRET` - validated if set, so a weak secret is caught here too

use thiserror::Error;

use donghang_site::config::{AdminConfig, ConfigError};
use donghang_site::services::AdminGate;

/// Errors that can occur during admin checks.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Admin configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The candidate does not match.
    #[error("Password does not match ADMIN_PASSWORD")]
    Mismatch,
}

/// Verify a candidate password the same way the login endpoint does.
///
/// # Errors
///
/// Returns `AdminError::Mismatch` when the password is wrong.
pub fn check_password(candidate: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("SITE_BASE_URL").unwrap_or_default();
    let config = AdminConfig::from_env(&base_url)?;

    AdminGate::new(&config)
        .verify_password(candidate)
        .map_err(|_| AdminError::Mismatch)?;

    tracing::info!("Password matches ADMIN_PASSWORD");
    Ok(())
}
