//! Shared-secret access gate and its session cookie.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "journey_auth";
pub const SESSION_DAYS: i64 = 7;

/// Failures carry the message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("No password is configured for this trip, contact the administrator")]
    NotConfigured,
    #[error("Please enter the password")]
    EmptyPassword,
    #[error("Incorrect password, please try again")]
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// `Set-Cookie` header value for this session.
    pub fn cookie_header(&self, secure: bool) -> String {
        let mut header = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.value,
            Duration::days(SESSION_DAYS).num_seconds()
        );
        if secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Holds the configured secret, if any. Built once from settings.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn login(&self, password: &str, now: DateTime<Utc>) -> Result<Session, AccessError> {
        if password.is_empty() {
            return Err(AccessError::EmptyPassword);
        }
        let secret = self.secret.as_deref().ok_or_else(|| {
            tracing::error!("login attempted but no password is configured");
            AccessError::NotConfigured
        })?;
        if password != secret {
            tracing::info!("login rejected");
            return Err(AccessError::Rejected);
        }

        let expires_at = now + Duration::days(SESSION_DAYS);
        let expiry = expires_at.timestamp();
        tracing::info!(expires_at = %expires_at, "login accepted");
        Ok(Session {
            value: format!("{}.{}", expiry, sign(secret, expiry)),
            expires_at,
        })
    }

    /// True when `cookie` was issued under the current secret and has not
    /// expired at `now`.
    pub fn validate(&self, cookie: &str, now: DateTime<Utc>) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return false;
        };
        let Some((expiry, signature)) = cookie.split_once('.') else {
            return false;
        };
        let Ok(expiry) = expiry.parse::<i64>() else {
            return false;
        };
        expiry > now.timestamp() && sign(secret, expiry) == signature
    }
}

fn sign(secret: &str, expiry: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(expiry.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
