/**
 * Authentication Handler Types
 *
 * Request and response bodies for register, login and `me`, plus the
 * validation that turns a raw registration into something storable.
 *
 * Request fields are optional on the wire so that a missing field produces a
 * field-level message instead of a decoder error.
 */

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::shared::error::{required_text, SharedError};
use crate::shared::PublicUser;

/// Bio given to users who register without one
pub const DEFAULT_BIO: &str = "The author has not shared anything about themselves yet.";

/// Avatar colors handed out at registration
pub const AVATAR_PALETTE: [&str; 6] = [
    "#3498db", "#e74c3c", "#27ae60", "#9b59b6", "#e67e22", "#1abc9c",
];

pub const MIN_PASSWORD_LEN: usize = 6;

/// Register request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plain password (hashed before storage, never logged)
    pub password: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub birthdate: Option<String>,
    pub bio: Option<String>,
}

/// Registration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    /// Lower-cased and trimmed
    pub email: String,
    pub password: String,
    pub birthdate: NaiveDate,
    pub bio: String,
}

/// Lower-case and trim an email; it must look like an address.
pub fn normalize_email(raw: Option<&str>) -> Result<String, SharedError> {
    let email = required_text("email", raw)?.to_lowercase();
    if !email.contains('@') {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    Ok(email)
}

fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

impl RegisterRequest {
    /// Validate against `today`, which bounds the birthdate.
    pub fn validate(&self, today: NaiveDate) -> Result<Registration, SharedError> {
        let name = required_text("name", self.name.as_deref())?;
        let email = normalize_email(self.email.as_deref())?;

        let password = self.password.clone().unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SharedError::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        let raw_birthdate = required_text("birthdate", self.birthdate.as_deref())?;
        let birthdate = parse_birthdate(&raw_birthdate)
            .ok_or_else(|| SharedError::validation("birthdate", "Invalid birthdate"))?;
        if birthdate > today {
            return Err(SharedError::validation(
                "birthdate",
                "Birthdate cannot be in the future",
            ));
        }

        let bio = self
            .bio
            .as_deref()
            .map(str::trim)
            .filter(|bio| !bio.is_empty())
            .unwrap_or(DEFAULT_BIO)
            .to_string();

        Ok(Registration {
            name,
            email,
            password,
            birthdate,
            bio,
        })
    }
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Auth response
///
/// Returned by register and login.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// JWT token for authentication (30-day expiration)
    pub token: String,
    pub user: PublicUser,
}

/// Response of `GET /api/auth/me`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MeResponse {
    pub user: PublicUser,
}
