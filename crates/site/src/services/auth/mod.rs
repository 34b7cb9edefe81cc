//! Admin session gate.
//!
//! A single shared password unlocks the inbox. A successful check issues a
//! stateless session token of the form `v1.<expires_unix>.<hex hmac>`, signed
//! with HMAC-SHA256 and carried in an HTTP-only cookie. Nothing is stored on
//! the server, so sessions survive restarts and end only when the token
//! expires or the browser drops the cookie.

mod error;

pub use error::AuthError;

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::config::AdminConfig;

type HmacSha256 = Hmac<Sha256>;

/// Token format version prefix.
const TOKEN_VERSION: &str = "v1";

/// How long an admin session lasts (24 hours).
pub const SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Domain separator for deriving a signing key from the password.
const DERIVED_KEY_CONTEXT: &[u8] = b"donghang-admin-session:";

/// Password check and session token issuing/verification.
#[derive(Clone)]
pub struct AdminGate {
    password: SecretString,
    signing_key: SecretString,
    secure_cookies: bool,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("password", &"[REDACTED]")
            .field("signing_key", &"[REDACTED]")
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// A freshly issued session token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Opaque token value for the cookie
    pub value: String,
    /// Unix timestamp (seconds) after which the token is rejected
    pub expires_at: i64,
}

impl AdminGate {
    /// Build the gate from configuration.
    ///
    /// Without an explicit session secret the signing key is derived from the
    /// admin password, so rotating the password also ends every session.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        let signing_key = config.session_secret.clone().unwrap_or_else(|| {
            let mut hasher = Sha256::new();
            hasher.update(DERIVED_KEY_CONTEXT);
            hasher.update(config.password.expose_secret().as_bytes());
            SecretString::from(hex::encode(hasher.finalize()))
        });

        Self {
            password: config.password.clone(),
            signing_key,
            secure_cookies: config.secure_cookies,
        }
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub const fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    /// Check a submitted password and issue a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    #[instrument(skip_all)]
    pub fn login(&self, candidate: &str) -> Result<SessionToken, AuthError> {
        self.verify_password(candidate)?;
        debug!("Admin password accepted");
        Ok(self.issue_at(Utc::now().timestamp()))
    }

    /// Compare a candidate password with the admin password.
    ///
    /// Both sides are hashed first so the comparison runs over equal-length
    /// inputs and takes the same time wherever they differ.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch.
    pub fn verify_password(&self, candidate: &str) -> Result<(), AuthError> {
        let expected = Sha256::digest(self.password.expose_secret().as_bytes());
        let actual = Sha256::digest(candidate.as_bytes());

        if constant_time_eq(&expected, &actual) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Issue a token that expires `SESSION_TTL_SECONDS` after `now`.
    #[must_use]
    pub fn issue_at(&self, now: i64) -> SessionToken {
        let expires_at = now + SESSION_TTL_SECONDS;
        let payload = format!("{TOKEN_VERSION}.{expires_at}");
        let signature = hex::encode(self.sign(&payload));

        SessionToken {
            value: format!("{payload}.{signature}"),
            expires_at,
        }
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` for malformed or forged tokens and
    /// `AuthError::SessionExpired` for expired ones.
    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// See [`AdminGate::verify`].
    pub fn verify_at(&self, token: &str, now: i64) -> Result<(), AuthError> {
        let mut parts = token.splitn(3, '.');
        let (Some(version), Some(expires), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidSession);
        };

        if version != TOKEN_VERSION {
            return Err(AuthError::InvalidSession);
        }

        let expires_at: i64 = expires.parse().map_err(|_| AuthError::InvalidSession)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::InvalidSession)?;

        let mut mac = self.mac();
        mac.update(format!("{version}.{expires}").as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSession)?;

        if now >= expires_at {
            return Err(AuthError::SessionExpired);
        }

        Ok(())
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(self.signing_key.expose_secret().as_bytes())
            .expect("HMAC can take key of any size")
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;

    fn config(password: &str, secret: Option<&str>) -> AdminConfig {
        AdminConfig {
            password: SecretString::from(password.to_string()),
            session_secret: secret.map(|s| SecretString::from(s.to_string())),
            secure_cookies: false,
        }
    }

    fn gate() -> AdminGate {
        AdminGate::new(&config("correct horse battery", None))
    }

    #[test]
    fn test_password_check() {
        let gate = gate();
        assert!(gate.verify_password("correct horse battery").is_ok());
        assert_eq!(
            gate.verify_password("wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(gate.verify_password(""), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let gate = gate();
        let token = gate.login("correct horse battery").unwrap();
        assert!(token.value.starts_with("v1."));
        assert!(gate.verify(&token.value).is_ok());
    }

    #[test]
    fn test_login_wrong_password_issues_nothing() {
        assert_eq!(gate().login("nope"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let gate = gate();
        let token = gate.issue_at(NOW);
        assert_eq!(token.expires_at, NOW + SESSION_TTL_SECONDS);

        assert!(gate.verify_at(&token.value, NOW + SESSION_TTL_SECONDS - 1).is_ok());
        assert_eq!(
            gate.verify_at(&token.value, NOW + SESSION_TTL_SECONDS),
            Err(AuthError::SessionExpired)
        );
    }

    #[test]
    fn test_tampered_expiry_is_rejected() {
        let gate = gate();
        let token = gate.issue_at(NOW);
        let signature = token.value.rsplit('.').next().unwrap();
        let forged = format!("v1.{}.{signature}", NOW + 10 * SESSION_TTL_SECONDS);

        assert_eq!(
            gate.verify_at(&forged, NOW),
            Err(AuthError::InvalidSession)
        );
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let gate = gate();
        for token in ["", "v1", "v1.123", "v2.123.abcd", "v1.soon.abcd", "v1.123.zz"] {
            assert_eq!(
                gate.verify_at(token, NOW),
                Err(AuthError::InvalidSession),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let token = gate().issue_at(NOW);
        let other = AdminGate::new(&config("a different password", None));
        assert_eq!(
            other.verify_at(&token.value, NOW),
            Err(AuthError::InvalidSession)
        );
    }

    #[test]
    fn test_explicit_secret_overrides_derived_key() {
        let with_secret = AdminGate::new(&config(
            "correct horse battery",
            Some("k8Jd2mQ9xR4vT7wZ1nB5cF3hL6pS0yUe"),
        ));
        let token = with_secret.issue_at(NOW);

        assert!(with_secret.verify_at(&token.value, NOW).is_ok());
        assert_eq!(
            gate().verify_at(&token.value, NOW),
            Err(AuthError::InvalidSession)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", gate());
        assert!(!debug_output.contains("correct horse"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
