//! Error taxonomy for authentication, registration and authorization flows.
//!
//! # Invariants
//! - `user_message()` never includes passwords, hashes or store internals.
//! - Store failures on primary reads/writes surface as `StoreUnavailable`.

use crate::auth::guard::Denial;
use crate::auth::hashing::HashError;
use crate::auth::password_policy::PasswordPolicyViolation;
use crate::model::identity::IdentityId;
use crate::repo::identity_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Reason a submitted form failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    PasswordMismatch,
    WeakPassword(PasswordPolicyViolation),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::WeakPassword(violation) => write!(f, "{violation}"),
        }
    }
}

impl Error for ValidationError {}

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    Validation(ValidationError),
    DuplicateIdentity,
    RoleNotPermitted,
    NotAuthenticated,
    NotAuthorized,
    SelfDeleteForbidden,
    UnsupportedAction(String),
    IdentityNotFound(IdentityId),
    /// Credential store or hashing backend failed during a primary operation.
    StoreUnavailable(Box<dyn Error + Send + Sync>),
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "validation_error",
            Self::DuplicateIdentity => "duplicate_identity",
            Self::RoleNotPermitted => "role_not_permitted",
            Self::NotAuthenticated => "not_authenticated",
            Self::NotAuthorized => "not_authorized",
            Self::SelfDeleteForbidden => "self_delete_forbidden",
            Self::UnsupportedAction(_) => "unsupported_action",
            Self::IdentityNotFound(_) => "identity_not_found",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Message safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::Validation(err) => {
                let mut message = err.to_string();
                if let Some(first) = message.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{message}.")
            }
            Self::DuplicateIdentity => {
                "An employee with that email or national id already exists.".to_string()
            }
            Self::IdentityNotFound(_) => "Employee not found.".to_string(),
            Self::StoreUnavailable(_) => {
                "The service is temporarily unavailable. Please try again.".to_string()
            }
            other => other
                .denial()
                .map_or("Request refused.", |denial| denial.message())
                .to_string(),
        }
    }

    /// The guard denial this error corresponds to, if any.
    pub fn denial(&self) -> Option<Denial> {
        match self {
            Self::NotAuthenticated => Some(Denial::NotAuthenticated),
            Self::NotAuthorized => Some(Denial::NotAuthorized),
            Self::SelfDeleteForbidden => Some(Denial::SelfDeleteForbidden),
            Self::RoleNotPermitted => Some(Denial::RoleNotPermitted),
            Self::UnsupportedAction(keyword) => Some(Denial::UnsupportedAction(keyword.clone())),
            _ => None,
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::DuplicateIdentity => write!(f, "duplicate identity"),
            Self::RoleNotPermitted => write!(f, "role not permitted"),
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::NotAuthorized => write!(f, "not authorized"),
            Self::SelfDeleteForbidden => write!(f, "self delete forbidden"),
            Self::UnsupportedAction(keyword) => write!(f, "unsupported action `{keyword}`"),
            Self::IdentityNotFound(id) => write!(f, "employee not found: {id}"),
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<Denial> for AuthError {
    fn from(value: Denial) -> Self {
        match value {
            Denial::NotAuthenticated => Self::NotAuthenticated,
            Denial::NotAuthorized => Self::NotAuthorized,
            Denial::SelfDeleteForbidden => Self::SelfDeleteForbidden,
            Denial::RoleNotPermitted => Self::RoleNotPermitted,
            Denial::UnsupportedAction(keyword) => Self::UnsupportedAction(keyword),
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::IdentityNotFound(id),
            RepoError::Duplicate => Self::DuplicateIdentity,
            RepoError::Db(err) => Self::StoreUnavailable(Box::new(err)),
        }
    }
}

impl From<HashError> for AuthError {
    fn from(value: HashError) -> Self {
        Self::StoreUnavailable(Box::new(value))
    }
}
