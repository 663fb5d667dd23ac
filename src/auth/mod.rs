//! Local sign-in: user profiles, a credential store and the active session.

pub mod json_store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json_store::JsonCredentialStore;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid e-mail or password")]
    InvalidCredentials,
    #[error("e-mail `{0}` is already registered")]
    EmailAlreadyUsed(String),
    #[error("no account found for e-mail `{0}`")]
    UnknownEmail(String),
    #[error("invalid sign-up data: {0}")]
    InvalidInput(String),
    #[error("credential storage failed: {0}")]
    Storage(String),
}

/// Public part of an account, safe to hand to the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

pub trait CredentialStore {
    fn authenticate(&self, email: &str, password: &str) -> Result<Profile, AuthError>;

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        birth_date: NaiveDate,
    ) -> Result<Profile, AuthError>;

    /// Checks that the account exists. Delivery of reset instructions is out
    /// of band.
    fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

/// The signed-in profile plus an opaque token for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub profile: Profile,
    pub token: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(profile: Profile) -> Self {
        let token = format!("session_{}_{}", profile.id, uuid::Uuid::new_v4().simple());
        Self {
            profile,
            token,
            started_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.profile.name
    }
}

/// Lower-cases and trims an e-mail so lookups ignore case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::InvalidInput("name must not be empty".into()));
    }
    let email = email.trim();
    let valid_email = email
        .split_once('@')
        .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid_email {
        return Err(AuthError::InvalidInput(format!("`{}` is not an e-mail address", email)));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password needs at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
