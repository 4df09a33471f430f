//! Request-scoped session identity.
//!
//! # Responsibility
//! - Hold who the current caller is between login and logout.
//! - Stay a plain value the transport carries (e.g. in a session cookie);
//!   there is no process-wide session state.
//!
//! # Invariants
//! - `Authenticated.role` is always a normalized `Role`.
//! - `Anonymous` until a login or registration succeeds.

use crate::model::identity::IdentityId;
use crate::model::role::Role;
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated caller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Random per-login id used to correlate log events.
    pub session_id: Uuid,
    pub employee_id: IdentityId,
    pub employee_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionIdentity {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

impl SessionIdentity {
    /// Starts a new authenticated session, replacing any previous one.
    pub fn authenticate(&mut self, employee_id: IdentityId, employee_name: String, role: Role) {
        let session_id = Uuid::new_v4();
        *self = Self::Authenticated(AuthenticatedIdentity {
            session_id,
            employee_id,
            employee_name,
            role,
        });
    }

    /// Clears the session. Safe to call when already anonymous.
    pub fn logout(&mut self) {
        if let Self::Authenticated(identity) = std::mem::take(self) {
            info!(
                "event=logout module=session status=ok session_id={} employee_id={}",
                identity.session_id, identity.employee_id
            );
        }
    }

    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    pub fn employee_id(&self) -> Option<IdentityId> {
        self.identity().map(|identity| identity.employee_id)
    }

    pub fn role(&self) -> Option<&Role> {
        self.identity().map(|identity| &identity.role)
    }

    pub fn is_chief(&self) -> bool {
        self.role().is_some_and(Role::is_chief)
    }

    /// Replaces the role of an authenticated session in place.
    pub(crate) fn refresh_role(&mut self, role: Role) {
        if let Self::Authenticated(identity) = self {
            identity.role = role;
        }
    }
}
