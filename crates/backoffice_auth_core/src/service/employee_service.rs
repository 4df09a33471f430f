//! Guarded employee administration.
//!
//! # Responsibility
//! - Create, edit and delete employee records on behalf of a session.
//! - Run the guard before touching the store.
//!
//! # Invariants
//! - Every operation is denied for anonymous sessions before any store access.
//! - Submitted roles go through the chief assignment rule on create and edit.
//! - Only a chief may change a chief's record; non-chiefs cannot change
//!   their own role.
//! - Editing one's own record refreshes the session role.

use crate::auth::guard::{
    require, require_record_change, require_role_assignment, ProtectedOperation,
};
use crate::auth::hashing::hash_password;
use crate::auth::password_policy;
use crate::auth::permission::Action;
use crate::error::{AuthError, AuthResult, ValidationError};
use crate::model::entity::Entity;
use crate::model::identity::IdentityId;
use crate::model::role::{normalize, CanonicalRole, Role};
use crate::repo::identity_repo::CredentialStore;
use crate::service::auth_service::{prepare_new_identity, warn_on_bootstrap_race, RegistrationForm};
use crate::session::SessionIdentity;
use log::info;

/// Role/password change submitted on the employee edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    /// `None` or blank keeps the stored role.
    pub role: Option<String>,
    /// `None` or blank keeps the stored password.
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

pub struct EmployeeService<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> EmployeeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an employee without changing the caller's session.
    pub fn create_employee(
        &self,
        session: &SessionIdentity,
        form: &RegistrationForm,
    ) -> AuthResult<IdentityId> {
        require(session, &ProtectedOperation::new(Entity::Employee, Action::Add)).into_result()?;

        let prepared = prepare_new_identity(&self.store, session, form)?;
        let id = self.store.insert(&prepared.identity)?;
        info!(
            "event=employee_create module=employee status=ok employee_id={id} role={} by={}",
            prepared.role,
            actor(session)
        );
        if prepared.bootstrap_chief {
            warn_on_bootstrap_race(&self.store, id);
        }
        Ok(id)
    }

    /// Updates role and optionally password of employee `id`.
    pub fn edit_employee(
        &self,
        session: &mut SessionIdentity,
        id: IdentityId,
        update: &EmployeeUpdate,
    ) -> AuthResult<()> {
        require(session, &ProtectedOperation::on_employee(Action::Edit, id)).into_result()?;

        let target = self
            .store
            .find_by_id(id)?
            .ok_or(AuthError::IdentityNotFound(id))?;

        let current = normalize(target.role.as_deref());
        let requested = match non_blank(update.role.as_deref()) {
            Some(submitted) => {
                let chief_exists = self.store.count_with_role(CanonicalRole::Chief)? > 0;
                Some(require_role_assignment(session, Some(submitted), chief_exists)?)
            }
            None => None,
        };
        require_record_change(session, id, current.as_ref(), requested)?;
        let role = requested.map(Role::from).or(current).unwrap_or(Role::STAFF);

        let password_hash = match non_blank(update.new_password.as_deref()) {
            Some(password) => {
                if update.confirm_password.as_deref() != Some(password) {
                    return Err(ValidationError::PasswordMismatch.into());
                }
                password_policy::validate(Some(password)).map_err(ValidationError::WeakPassword)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        self.store
            .update_role_and_maybe_password(id, role.as_str(), password_hash.as_deref())?;
        info!(
            "event=employee_edit module=employee status=ok employee_id={id} role={role} password_changed={} by={}",
            password_hash.is_some(),
            actor(session)
        );

        if session.employee_id() == Some(id) {
            session.refresh_role(role);
        }
        Ok(())
    }

    /// Deletes employee `id`. Deleting oneself is always refused.
    pub fn delete_employee(&self, session: &SessionIdentity, id: IdentityId) -> AuthResult<()> {
        require(session, &ProtectedOperation::on_employee(Action::Delete, id)).into_result()?;
        self.store.delete(id)?;
        info!(
            "event=employee_delete module=employee status=ok employee_id={id} by={}",
            actor(session)
        );
        Ok(())
    }
}

fn actor(session: &SessionIdentity) -> String {
    session
        .employee_id()
        .map_or_else(|| "none".to_string(), |id| id.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
