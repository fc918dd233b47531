//! Process-wide state shared by every screen.
//!
//! One [`AppState`] is built at launch from the storage root and handed to
//! the shell, which serializes access to it. Nothing here is global.

use serde::{Deserialize, Serialize};

use crate::admin::AdminFlow;
use crate::auth::{AuthService, Session};
use crate::config::AppConfig;
use crate::errors::{FlowError, FormError, StartupError};
use crate::home::HomeFlow;
use crate::hr::HrFlow;
use crate::notice::Notice;
use crate::roster::sample_candidates;
use crate::storage::StoragePaths;
use crate::store::EncryptedFileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Login and registration form. `confirm_password` is only read on sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl LoginForm {
    fn check(&self, registering: bool) -> Result<(), FormError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields("Please fill in all required fields."));
        }
        if registering && self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub paths: StoragePaths,
    pub store: EncryptedFileStore,
    pub auth: AuthService,
    pub home: HomeFlow,
    pub hr: HrFlow,
    pub admin: AdminFlow,
    theme: Theme,
    session: Option<Session>,
}

impl AppState {
    /// Loads (or creates) config, store and accounts under `root`.
    pub fn open(root: impl Into<std::path::PathBuf>) -> Result<Self, StartupError> {
        let paths = StoragePaths::new(root)?;
        let config = AppConfig::load_or_init(&paths)?;
        Self::with_config(paths, config)
    }

    pub fn with_config(paths: StoragePaths, config: AppConfig) -> Result<Self, StartupError> {
        let mut store = EncryptedFileStore::open(
            paths.data_file(),
            config.store_secret.as_str(),
            config.kdf_iterations,
        )?;
        if config.seed_sample_roster {
            store.seed_if_empty(&sample_candidates()?)?;
        }
        let auth = AuthService::new(paths.accounts_file(), config.kdf_iterations);
        tracing::info!(root = %paths.root().display(), "app state ready");
        Ok(AppState {
            theme: Theme::from_dark_mode(config.dark_mode),
            config,
            paths,
            store,
            auth,
            home: HomeFlow::default(),
            hr: HrFlow::default(),
            admin: AdminFlow::default(),
            session: None,
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and remembers it for the next launch. The in-memory
    /// theme changes even if the config cannot be written.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.config.dark_mode = self.theme.is_dark();
        if let Err(err) = self.config.save(&self.paths) {
            tracing::warn!(error = %err, "failed to persist theme");
        }
        self.theme
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn sign_in(&mut self, form: &LoginForm) -> Result<Notice, FlowError> {
        form.check(false)?;
        let session = self
            .auth
            .sign_in(form.email.as_str(), form.password.as_str())
            .map_err(|source| {
                tracing::warn!(error = %source, "sign-in rejected");
                FlowError::Auth {
                    registering: false,
                    source,
                }
            })?;
        self.session = Some(session);
        Ok(Notice::info("Login Successful", "Welcome back!"))
    }

    pub fn sign_up(&mut self, form: &LoginForm) -> Result<Notice, FlowError> {
        form.check(true)?;
        let session = self
            .auth
            .sign_up(form.email.as_str(), form.password.as_str())
            .map_err(|source| {
                tracing::warn!(error = %source, "sign-up rejected");
                FlowError::Auth {
                    registering: true,
                    source,
                }
            })?;
        self.session = Some(session);
        Ok(Notice::info(
            "Account Created",
            "Your account has been created successfully!",
        ))
    }

    /// Drops the session and whatever the signed-in screens had loaded.
    pub fn sign_out(&mut self) -> Notice {
        if let Some(session) = self.session.take() {
            tracing::info!(email = %session.email, "signed out");
        }
        self.hr = HrFlow::default();
        self.admin = AdminFlow::default();
        Notice::info("Logged Out", "You have been successfully logged out.")
    }

    /// Blocks or restores sign-in for an existing account. A disabled
    /// account keeps its password hash.
    pub fn set_account_disabled(&self, email: &str, disabled: bool) -> Result<Notice, FlowError> {
        self.auth.set_disabled(email, disabled).map_err(|source| {
            tracing::error!(error = %source, email, "failed to update account");
            FlowError::Account(source)
        })?;
        tracing::info!(email, disabled, "account access changed");
        let state = if disabled { "disabled" } else { "enabled" };
        Ok(Notice::info("Success", format!("Account {state}")))
    }

    pub fn export_row_limit(&self) -> usize {
        self.config.export_row_limit
    }
}
