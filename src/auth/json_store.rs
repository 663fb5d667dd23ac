use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use super::{normalize_email, validate_signup, AuthError, CredentialStore, Profile};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    #[serde(flatten)]
    profile: Profile,
    salt: String,
    password_digest: String,
}

impl StoredUser {
    fn verifies(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_digest
    }
}

/// Accounts kept in a JSON file, with salted SHA-256 password digests.
#[derive(Debug, Clone)]
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_users(&self) -> Result<Vec<StoredUser>, AuthError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(storage_error)?;
        serde_json::from_str(&data).map_err(storage_error)
    }

    fn write_users(&self, users: &[StoredUser]) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let json = serde_json::to_string_pretty(users).map_err(storage_error)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp).map_err(storage_error)?;
        file.write_all(json.as_bytes()).map_err(storage_error)?;
        file.sync_all().map_err(storage_error)?;
        fs::rename(&tmp, &self.path).map_err(storage_error)?;
        Ok(())
    }
}

impl CredentialStore for JsonCredentialStore {
    fn authenticate(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let email = normalize_email(email);
        let users = self.read_users()?;
        let user = users
            .into_iter()
            .find(|user| user.profile.email == email && user.verifies(password))
            .ok_or(AuthError::InvalidCredentials)?;
        info!(user = %user.profile.id, "signed in");
        Ok(user.profile)
    }

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        birth_date: NaiveDate,
    ) -> Result<Profile, AuthError> {
        validate_signup(name, email, password)?;
        let email = normalize_email(email);
        let mut users = self.read_users()?;
        if users.iter().any(|user| user.profile.email == email) {
            return Err(AuthError::EmailAlreadyUsed(email));
        }
        let profile = Profile {
            id: Uuid::new_v4().simple().to_string(),
            name: name.trim().to_string(),
            email,
            birth_date,
            created_at: Utc::now(),
        };
        let salt = Uuid::new_v4().simple().to_string();
        users.push(StoredUser {
            profile: profile.clone(),
            password_digest: digest(&salt, password),
            salt,
        });
        self.write_users(&users)?;
        info!(user = %profile.id, "account registered");
        Ok(profile)
    }

    fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        let users = self.read_users()?;
        if users.iter().any(|user| user.profile.email == email) {
            debug!("password reset requested");
            Ok(())
        } else {
            Err(AuthError::UnknownEmail(email))
        }
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn storage_error(err: impl std::fmt::Display) -> AuthError {
    AuthError::Storage(err.to_string())
}
