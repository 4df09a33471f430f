//! Role-based authorization and session identity core for the back office.
//! Entity handlers call into this crate before touching any record.

pub mod auth;
pub mod boundary;
pub mod config;
pub mod db;
pub mod entry;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use auth::guard::{
    assignable_roles, require, require_keyword, require_record_change, require_role_assignment,
    Decision, Denial, ProtectedOperation,
};
pub use auth::password_policy::{is_valid as is_valid_password, PasswordPolicyViolation};
pub use auth::permission::{allowed, Action, UnsupportedAction};
pub use boundary::{authorize, outcome_for, Outcome, Redirect};
pub use config::{ConfigError, CoreConfig};
pub use error::{AuthError, AuthResult, ValidationError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::Entity;
pub use model::identity::{Identity, IdentityId, NewIdentity};
pub use model::role::{normalize as normalize_role, CanonicalRole, Role};
pub use repo::identity_repo::{CredentialStore, RepoError, RepoResult, SqliteCredentialStore};
pub use service::auth_service::{AuthService, LoginForm, RegistrationForm};
pub use service::employee_service::{EmployeeService, EmployeeUpdate};
pub use service::Redisplayable;
pub use session::{AuthenticatedIdentity, SessionIdentity};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
