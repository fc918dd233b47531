//! Email/password accounts kept in a local accounts file.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{hash_password, verify_password, PasswordHash};
use crate::errors::AuthError;
use crate::storage::write_text_file;

const MIN_PASSWORD_LEN: usize = 6;
const ADMIN_EMAIL_MARKERS: [&str; 2] = ["admin", "smarted"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Admin,
    Hr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: String,
    pub screen: Screen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    email: String,
    password: PasswordHash,
    #[serde(default)]
    disabled: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
}

/// Emails mentioning "admin" or "smarted" land on the admin screen.
pub fn route_for_email(email: &str) -> Screen {
    if ADMIN_EMAIL_MARKERS.iter().any(|marker| email.contains(marker)) {
        Screen::Admin
    } else {
        Screen::Hr
    }
}

/// `local@domain.tld` with no whitespace; nothing stricter.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct AuthService {
    path: PathBuf,
    iterations: u32,
}

impl AuthService {
    pub fn new(path: impl Into<PathBuf>, iterations: u32) -> Self {
        AuthService {
            path: path.into(),
            iterations,
        }
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut file = self.read()?;
        let key = account_key(email);
        if file.accounts.contains_key(key.as_str()) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        file.accounts.insert(
            key,
            Account {
                email: email.to_string(),
                password: hash_password(password, self.iterations),
                disabled: false,
                created_at: Utc::now(),
            },
        );
        self.write(&file)?;
        tracing::info!(email, "account created");
        Ok(Session {
            email: email.to_string(),
            screen: Screen::Hr,
        })
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        let file = self.read()?;
        let account = file
            .accounts
            .get(account_key(email).as_str())
            .ok_or(AuthError::UserNotFound)?;
        if account.disabled {
            return Err(AuthError::UserDisabled);
        }
        if account.password.salt.is_empty() || account.password.hash.is_empty() {
            return Err(AuthError::InvalidCredential);
        }
        if !verify_password(password, &account.password) {
            return Err(AuthError::WrongPassword);
        }
        Ok(Session {
            email: email.to_string(),
            screen: route_for_email(email),
        })
    }

    pub fn set_disabled(&self, email: &str, disabled: bool) -> Result<(), AuthError> {
        let mut file = self.read()?;
        let account = file
            .accounts
            .get_mut(account_key(email).as_str())
            .ok_or(AuthError::UserNotFound)?;
        account.disabled = disabled;
        self.write(&file)
    }

    fn read(&self) -> Result<AccountsFile, AuthError> {
        if !self.path.exists() {
            return Ok(AccountsFile::default());
        }
        let raw = fs::read_to_string(self.path.as_path())?;
        Ok(serde_json::from_str(raw.as_str())?)
    }

    fn write(&self, file: &AccountsFile) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(file)?;
        write_text_file(self.path.as_path(), content.as_str())?;
        Ok(())
    }
}
