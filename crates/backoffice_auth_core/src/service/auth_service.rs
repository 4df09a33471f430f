//! Login, logout and self-registration use-cases.
//!
//! # Responsibility
//! - Establish a `SessionIdentity` from credentials or a new registration.
//! - Backfill missing roles on first login.
//! - Apply the chief bootstrap rule to self-registration.
//!
//! # Invariants
//! - Unknown email and wrong password are indistinguishable to the caller.
//! - A failing role backfill never blocks a login.
//! - Sessions always carry a normalized role.
//! - The chief-exists check and the insert are not atomic; concurrent first
//!   registrations may both become chief. This is detected and logged.

use crate::auth::guard::{assignable_roles, require_role_assignment};
use crate::auth::hashing::{hash_password, verify_password};
use crate::auth::password_policy;
use crate::error::{AuthError, AuthResult, ValidationError};
use crate::model::identity::{IdentityId, NewIdentity};
use crate::model::role::{normalize, CanonicalRole, Role};
use crate::repo::identity_repo::CredentialStore;
use crate::service::Redisplayable;
use crate::session::SessionIdentity;
use log::{info, warn};

/// Login form as submitted by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Redisplayable for LoginForm {
    fn without_secrets(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: String::new(),
        }
    }
}

/// Employee registration/creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub requested_role: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

impl Redisplayable for RegistrationForm {
    fn without_secrets(&self) -> Self {
        Self {
            password: String::new(),
            confirm_password: String::new(),
            ..self.clone()
        }
    }
}

/// Validated insert payload plus the role decision behind it.
pub(crate) struct PreparedIdentity {
    pub identity: NewIdentity,
    pub role: CanonicalRole,
    /// Chief was granted because no chief existed yet.
    pub bootstrap_chief: bool,
}

/// Runs field, password, uniqueness and role checks shared by
/// self-registration and chief-managed creation.
pub(crate) fn prepare_new_identity<S: CredentialStore>(
    store: &S,
    session: &SessionIdentity,
    form: &RegistrationForm,
) -> AuthResult<PreparedIdentity> {
    for (field, value) in [
        ("name", form.name.as_str()),
        ("national id", form.national_id.as_str()),
        ("email", form.email.as_str()),
        ("password", form.password.as_str()),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field).into());
        }
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch.into());
    }
    password_policy::validate(Some(form.password.as_str()))
        .map_err(ValidationError::WeakPassword)?;

    if store.exists_by_email_or_national_id(&form.email, &form.national_id)? {
        return Err(AuthError::DuplicateIdentity);
    }

    let chief_exists = store.count_with_role(CanonicalRole::Chief)? > 0;
    let role = require_role_assignment(session, form.requested_role.as_deref(), chief_exists)?;

    Ok(PreparedIdentity {
        identity: NewIdentity {
            name: form.name.trim().to_string(),
            national_id: form.national_id.trim().to_string(),
            email: form.email.clone(),
            password_hash: hash_password(&form.password)?,
            role: Some(role.as_str().to_string()),
            address: non_blank(form.address.as_deref()),
            department: non_blank(form.department.as_deref()),
            salary: form.salary,
        },
        role,
        bootstrap_chief: role == CanonicalRole::Chief && !chief_exists,
    })
}

/// Logs when more than one chief exists right after a bootstrap grant.
pub(crate) fn warn_on_bootstrap_race<S: CredentialStore>(store: &S, id: IdentityId) {
    match store.count_with_role(CanonicalRole::Chief) {
        Ok(count) if count > 1 => warn!(
            "event=chief_bootstrap module=auth status=race employee_id={id} chief_count={count}"
        ),
        Ok(_) => info!("event=chief_bootstrap module=auth status=ok employee_id={id}"),
        Err(err) => warn!(
            "event=chief_bootstrap module=auth status=error employee_id={id} error={err}"
        ),
    }
}

/// Authentication use-case service.
pub struct AuthService<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Authenticates by email and password and populates `session`.
    ///
    /// # Errors
    /// - `InvalidCredentials` for unknown email or non-matching password.
    /// - `StoreUnavailable` when the lookup itself fails.
    pub fn login(
        &self,
        session: &mut SessionIdentity,
        email: &str,
        password: &str,
    ) -> AuthResult<()> {
        let Some(identity) = self.store.find_by_email(email)? else {
            info!("event=login module=auth status=denied reason=unknown_email");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &identity.password_hash) {
            info!(
                "event=login module=auth status=denied reason=bad_password employee_id={}",
                identity.id
            );
            return Err(AuthError::InvalidCredentials);
        }

        let role = match normalize(identity.role.as_deref()) {
            Some(role) => role,
            None => {
                self.backfill_role(identity.id, CanonicalRole::Staff);
                Role::STAFF
            }
        };
        if let Role::Unrecognized(raw) = &role {
            warn!(
                "event=login module=auth status=ok employee_id={} unrecognized_role={}",
                identity.id, raw
            );
        }

        session.authenticate(identity.id, identity.name, role);
        if let Some(active) = session.identity() {
            info!(
                "event=login module=auth status=ok employee_id={} session_id={} role={}",
                active.employee_id, active.session_id, active.role
            );
        }
        Ok(())
    }

    /// Clears the session; idempotent.
    pub fn logout(&self, session: &mut SessionIdentity) {
        session.logout();
    }

    /// Registers a new employee and logs them in.
    ///
    /// # Errors
    /// - `Validation` for blank required fields, mismatched or weak passwords.
    /// - `DuplicateIdentity` when email or national id is taken.
    /// - `RoleNotPermitted` when the requested role is not assignable.
    pub fn register(
        &self,
        session: &mut SessionIdentity,
        form: &RegistrationForm,
    ) -> AuthResult<IdentityId> {
        let prepared = prepare_new_identity(&self.store, session, form)?;
        let id = self.store.insert(&prepared.identity)?;
        info!(
            "event=register module=auth status=ok employee_id={id} role={}",
            prepared.role
        );

        if prepared.bootstrap_chief {
            warn_on_bootstrap_race(&self.store, id);
        }

        session.authenticate(id, prepared.identity.name, prepared.role.into());
        Ok(id)
    }

    /// Whether any employee currently normalizes to chief.
    pub fn chief_exists(&self) -> AuthResult<bool> {
        Ok(self.store.count_with_role(CanonicalRole::Chief)? > 0)
    }

    /// Roles the session may pick on a registration/creation form.
    pub fn assignable_roles(&self, session: &SessionIdentity) -> AuthResult<Vec<CanonicalRole>> {
        Ok(assignable_roles(self.chief_exists()?, session.is_chief()))
    }

    fn backfill_role(&self, id: IdentityId, role: CanonicalRole) {
        match self
            .store
            .update_role_and_maybe_password(id, role.as_str(), None)
        {
            Ok(()) => {
                info!("event=role_backfill module=auth status=ok employee_id={id} role={role}")
            }
            Err(err) => warn!(
                "event=role_backfill module=auth status=error employee_id={id} error={err}"
            ),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
