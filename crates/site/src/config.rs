//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INQUIRY_STORE_URL` - Hosted store REST URL, or a `postgres://` connection
//!   string (falls back to `SUPABASE_URL`, then `DATABASE_URL`)
//! - `INQUIRY_STORE_KEY` - Store API key, required for the REST backend
//!   (falls back to `SUPABASE_ANON_KEY`)
//! - `ADMIN_PASSWORD` - Password that unlocks the admin inbox
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `SITE_NAME` - Business name shown in notifications (default: 동행콜센터)
//! - `SESSION_SECRET` - Admin session signing key (min 32 chars, high entropy).
//!   Derived from `ADMIN_PASSWORD` when unset.
//! - `DISCORD_WEBHOOK_URL` - New-inquiry notification webhook
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Business name, used in notification footers
    pub site_name: String,
    /// Inquiry store backend
    pub store: StoreConfig,
    /// Admin session gate configuration
    pub admin: AdminConfig,
    /// New-inquiry notification webhook (disabled when `None`)
    pub notify_webhook_url: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Where inquiries are stored.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub enum StoreConfig {
    /// Hosted REST API (PostgREST dialect) reached with an API key.
    Rest {
        /// Project base URL, without the `/rest/v1` suffix
        url: Url,
        /// API key, sent as both `apikey` and bearer token
        api_key: SecretString,
    },
    /// Direct `PostgreSQL` connection.
    Postgres {
        /// Connection string (contains password)
        database_url: SecretString,
    },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", &url.as_str())
                .field("api_key", &"[REDACTED]")
                .finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Admin session gate configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AdminConfig {
    /// The single admin password
    pub password: SecretString,
    /// Explicit session signing key, if configured
    pub session_secret: Option<SecretString>,
    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"[REDACTED]")
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SITE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("SITE_BASE_URL", "http://localhost:3000");
        let site_name = get_env_or_default("SITE_NAME", "동행콜센터");

        let store = StoreConfig::from_env()?;
        let admin = AdminConfig::from_env(&base_url)?;
        let notify_webhook_url = get_optional_env("DISCORD_WEBHOOK_URL").map(SecretString::from);

        Ok(Self {
            host,
            port,
            base_url,
            site_name,
            store,
            admin,
            notify_webhook_url,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    /// Load only the store settings (used by the CLI, which has no admin
    /// or server settings).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store URL is missing or malformed, or the
    /// REST backend has no API key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_first_env(&["INQUIRY_STORE_URL", "SUPABASE_URL", "DATABASE_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("INQUIRY_STORE_URL".to_string()))?;
        let api_key = get_first_env(&["INQUIRY_STORE_KEY", "SUPABASE_ANON_KEY"]);
        Self::parse(&raw, api_key)
    }

    /// Pick a backend from the store URL scheme.
    ///
    /// `postgres://` and `postgresql://` connect directly; anything else is
    /// treated as a REST endpoint and needs an API key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on an unparseable URL, or a REST key that is
    /// missing or can't be sent as a header.
    pub fn parse(raw: &str, api_key: Option<String>) -> Result<Self, ConfigError> {
        if raw.starts_with("postgres://") || raw.starts_with("postgresql://") {
            return Ok(Self::Postgres {
                database_url: SecretString::from(raw.to_string()),
            });
        }

        let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("INQUIRY_STORE_URL".to_string(), e.to_string())
        })?;
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("INQUIRY_STORE_KEY".to_string()))?;

        // Sent verbatim in the `apikey` and `Authorization` headers
        if !api_key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::InvalidEnvVar(
                "INQUIRY_STORE_KEY".to_string(),
                "must be printable ASCII without whitespace".to_string(),
            ));
        }

        Ok(Self::Rest {
            url,
            api_key: SecretString::from(api_key),
        })
    }
}

impl AdminConfig {
    /// Load the admin password and session settings.
    ///
    /// `base_url` decides whether cookies are marked `Secure`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ADMIN_PASSWORD` is missing or empty, or if
    /// `SESSION_SECRET` is set but too weak.
    pub fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let password = get_required_env("ADMIN_PASSWORD")?;
        if password.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_PASSWORD".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let session_secret = match get_optional_env("SESSION_SECRET") {
            Some(value) => {
                validate_secret_strength(&value, "SESSION_SECRET")?;
                let secret = SecretString::from(value);
                validate_session_secret(&secret, "SESSION_SECRET")?;
                Some(secret)
            }
            None => None,
        };

        Ok(Self {
            password: SecretString::from(password),
            session_secret,
            secure_cookies: base_url.starts_with("https://"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get the first variable that is set, in priority order.
fn get_first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
