use std::io;

use thiserror::Error;

use crate::notice::Notice;
use crate::store::Collection;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("cipher failure: {0}")]
    Cipher(String),
    #[error("invalid base64 payload: {0}")]
    Encoding(String),
}

/// Failures of the record store and of the schema check at its boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("store file could not be unlocked with the configured secret")]
    Locked,
    #[error("{collection} record '{id}' is malformed: {detail}")]
    Schema {
        collection: Collection,
        id: String,
        detail: String,
    },
    #[error("{collection} record '{id}' does not exist")]
    NotFound { collection: Collection, id: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Auth failures, one variant per code surfaced to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid-email")]
    InvalidEmail,
    #[error("user-disabled")]
    UserDisabled,
    #[error("user-not-found")]
    UserNotFound,
    #[error("wrong-password")]
    WrongPassword,
    #[error("email-already-in-use")]
    EmailAlreadyInUse,
    #[error("weak-password")]
    WeakPassword,
    #[error("invalid-credential")]
    InvalidCredential,
    #[error("accounts file unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("accounts file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail => "Invalid email address.",
            AuthError::UserDisabled => "This account has been disabled.",
            AuthError::UserNotFound => "No account found with this email.",
            AuthError::WrongPassword => "Incorrect password.",
            AuthError::EmailAlreadyInUse => "An account with this email already exists.",
            AuthError::WeakPassword => "Password should be at least 6 characters.",
            AuthError::InvalidCredential => "Invalid email or password.",
            AuthError::Io(_) | AuthError::Json(_) => "An error occurred. Please try again.",
        }
    }
}

/// Why a submitted access key unlocked nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Please enter a valid access key (format: AB1234)")]
    Malformed,
    #[error("The access key you entered is not valid or has expired.")]
    NotProvisioned,
}

/// Form checks that stop an operation before anything is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    MissingFields(&'static str),
    /// Admin form check, shown under a plain "Error" title.
    #[error("{0}")]
    Required(&'static str),
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no storage directory available")]
    NoStorageRoot,
}

/// Anything that stops the app state from being assembled at launch.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of a screen-level operation. Every variant renders as a
/// destructive notice and leaves the screen state as it was.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("authentication failed: {source}")]
    Auth {
        registering: bool,
        #[source]
        source: AuthError,
    },
    /// Account maintenance from the admin screen, outside sign-in.
    #[error("account update failed: {0}")]
    Account(#[source] AuthError),
}

impl FlowError {
    pub fn store(context: &'static str, source: StoreError) -> Self {
        FlowError::Store { context, source }
    }

    pub fn notice(&self) -> Notice {
        match self {
            FlowError::Access(err) => Notice::error("Invalid Access Key", err.to_string()),
            FlowError::Form(FormError::PasswordMismatch) => {
                Notice::error("Password Mismatch", FormError::PasswordMismatch.to_string())
            }
            FlowError::Form(FormError::Required(message)) => Notice::error("Error", *message),
            FlowError::Form(err) => Notice::error("Missing Information", err.to_string()),
            FlowError::Store { context, .. } => Notice::error("Error", *context),
            FlowError::Auth {
                registering,
                source,
            } => {
                let title = if *registering {
                    "Registration Failed"
                } else {
                    "Login Failed"
                };
                Notice::error(title, source.message())
            }
            FlowError::Account(source) => Notice::error("Error", source.message()),
        }
    }
}
