//! Authorization guard for protected back-office operations.
//!
//! # Responsibility
//! - Decide whether the current session may perform one operation.
//! - Apply the employee self-service overlays (self-edit allowed,
//!   self-delete forbidden).
//! - Decide which roles a caller may assign (chief bootstrap rule).
//!
//! # Invariants
//! - Anonymous sessions are always denied with `NotAuthenticated`.
//! - Deleting one's own employee record is denied for every role.
//! - A chief may only be assigned by a chief, or by anyone while no chief exists.
//! - Only a chief may change a chief's record, so a non-chief can never
//!   remove the last chief.
//! - Decisions are returned as values; the guard never performs I/O.

use crate::auth::permission::{allowed, Action};
use crate::model::entity::Entity;
use crate::model::identity::IdentityId;
use crate::model::role::{normalize, CanonicalRole, Role};
use crate::session::SessionIdentity;
use log::info;

/// One protected operation as requested by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedOperation {
    pub entity: Entity,
    pub action: Action,
    /// Target employee id for identity-relative checks.
    pub target: Option<IdentityId>,
}

impl ProtectedOperation {
    pub fn new(entity: Entity, action: Action) -> Self {
        Self {
            entity,
            action,
            target: None,
        }
    }

    pub fn on_employee(action: Action, target: IdentityId) -> Self {
        Self {
            entity: Entity::Employee,
            action,
            target: Some(target),
        }
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    NotAuthorized,
    SelfDeleteForbidden,
    RoleNotPermitted,
    UnsupportedAction(String),
}

impl Denial {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::NotAuthorized => "not_authorized",
            Self::SelfDeleteForbidden => "self_delete_forbidden",
            Self::RoleNotPermitted => "role_not_permitted",
            Self::UnsupportedAction(_) => "unsupported_action",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "Please log in to continue.",
            Self::NotAuthorized => "You do not have permission to perform this action.",
            Self::SelfDeleteForbidden => "You cannot delete your own account.",
            Self::RoleNotPermitted => "You are not allowed to assign that role.",
            Self::UnsupportedAction(_) => "That action is not supported.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Converts into `Result` so service code can use `?`.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(denial) => Err(denial),
        }
    }
}

/// Checks one operation against the session.
pub fn require(session: &SessionIdentity, operation: &ProtectedOperation) -> Decision {
    let Some(identity) = session.identity() else {
        return deny(session, operation, Denial::NotAuthenticated);
    };

    let role = normalize(Some(identity.role.as_str()));
    let is_self = operation.target == Some(identity.employee_id);

    if operation.entity == Entity::Employee && operation.action == Action::Delete && is_self {
        return deny(session, operation, Denial::SelfDeleteForbidden);
    }

    if role.as_ref().is_some_and(Role::is_chief) {
        return Decision::Allowed;
    }

    let is_employee_edit = operation.entity == Entity::Employee && operation.action == Action::Edit;
    let permitted = if is_employee_edit {
        is_self || role.as_ref().and_then(Role::canonical) == Some(CanonicalRole::Supervisor)
    } else {
        allowed(role.as_ref(), operation.action)
    };

    if permitted {
        Decision::Allowed
    } else {
        deny(session, operation, Denial::NotAuthorized)
    }
}

/// Checks an operation whose action arrives as a raw keyword.
pub fn require_keyword(
    session: &SessionIdentity,
    entity: Entity,
    keyword: &str,
    target: Option<IdentityId>,
) -> Decision {
    if !session.is_authenticated() {
        return deny_keyword(session, entity, keyword, Denial::NotAuthenticated);
    }
    match Action::parse(keyword) {
        Ok(action) => require(
            session,
            &ProtectedOperation {
                entity,
                action,
                target,
            },
        ),
        Err(err) => deny_keyword(session, entity, keyword, Denial::UnsupportedAction(err.0)),
    }
}

/// Roles the caller may assign, given whether a chief already exists.
pub fn assignable_roles(chief_exists: bool, caller_is_chief: bool) -> Vec<CanonicalRole> {
    let mut roles = Vec::with_capacity(3);
    if !chief_exists || caller_is_chief {
        roles.push(CanonicalRole::Chief);
    }
    roles.push(CanonicalRole::Supervisor);
    roles.push(CanonicalRole::Staff);
    roles
}

/// Checks a submitted role against the assignable set.
///
/// Returns the canonical role to persist on success. The submitted value is
/// normalized first, so legacy aliases resolve to their canonical tier.
pub fn require_role_assignment(
    session: &SessionIdentity,
    submitted: Option<&str>,
    chief_exists: bool,
) -> Result<CanonicalRole, Denial> {
    let requested = normalize(submitted).and_then(|role| role.canonical());
    let assignable = assignable_roles(chief_exists, session.is_chief());

    match requested {
        Some(role) if assignable.contains(&role) => Ok(role),
        _ => {
            info!(
                "event=role_assignment module=guard status=denied employee_id={} chief_exists={}",
                session
                    .employee_id()
                    .map_or_else(|| "none".to_string(), |id| id.to_string()),
                chief_exists
            );
            Err(Denial::RoleNotPermitted)
        }
    }
}

/// Checks a role/password change against the target's current role.
///
/// Non-chief callers may not touch a chief's record, and may not change
/// their own role. `requested` is the already-assignable new role, if any.
pub fn require_record_change(
    session: &SessionIdentity,
    target: IdentityId,
    current: Option<&Role>,
    requested: Option<CanonicalRole>,
) -> Result<(), Denial> {
    if session.is_chief() {
        return Ok(());
    }

    let denial = if current.is_some_and(Role::is_chief) {
        Some(Denial::NotAuthorized)
    } else {
        let current_tier = current.map_or(Some(CanonicalRole::Staff), Role::canonical);
        let is_self = session.employee_id() == Some(target);
        requested
            .filter(|role| is_self && current_tier != Some(*role))
            .map(|_| Denial::RoleNotPermitted)
    };

    match denial {
        Some(denial) => {
            info!(
                "event=record_change module=guard status=denied employee_id={} target={} reason={}",
                session
                    .employee_id()
                    .map_or_else(|| "none".to_string(), |id| id.to_string()),
                target,
                denial.code()
            );
            Err(denial)
        }
        None => Ok(()),
    }
}

fn deny(session: &SessionIdentity, operation: &ProtectedOperation, denial: Denial) -> Decision {
    deny_keyword(session, operation.entity, operation.action.as_str(), denial)
}

fn deny_keyword(
    session: &SessionIdentity,
    entity: Entity,
    action: &str,
    denial: Denial,
) -> Decision {
    info!(
        "event=authorize module=guard status=denied entity={} action={} employee_id={} reason={}",
        entity.as_str(),
        action,
        session
            .employee_id()
            .map_or_else(|| "none".to_string(), |id| id.to_string()),
        denial.code()
    );
    Decision::Denied(denial)
}

#[cfg(test)]
mod tests {
    use super::{
        assignable_roles, require, require_keyword, require_record_change, require_role_assignment,
        Decision, Denial, ProtectedOperation,
    };
    use crate::auth::permission::Action;
    use crate::model::entity::Entity;
    use crate::model::role::{CanonicalRole, Role};
    use crate::session::SessionIdentity;

    fn session_with(id: i64, role: Role) -> SessionIdentity {
        let mut session = SessionIdentity::default();
        session.authenticate(id, format!("employee-{id}"), role);
        session
    }

    #[test]
    fn anonymous_session_is_not_authenticated() {
        let session = SessionIdentity::default();
        for entity in Entity::ALL {
            assert_eq!(
                require(&session, &ProtectedOperation::new(entity, Action::View)),
                Decision::Denied(Denial::NotAuthenticated)
            );
        }
    }

    #[test]
    fn chief_is_allowed_everything_on_every_entity() {
        let session = session_with(1, Role::CHIEF);
        for entity in Entity::ALL {
            for action in Action::ALL {
                assert!(
                    require(&session, &ProtectedOperation::new(entity, action)).is_allowed(),
                    "{entity:?} {action}"
                );
            }
        }
        let delete_other = ProtectedOperation::on_employee(Action::Delete, 2);
        assert!(require(&session, &delete_other).is_allowed());
    }

    #[test]
    fn self_delete_is_forbidden_even_for_chief() {
        let session = session_with(1, Role::CHIEF);
        assert_eq!(
            require(&session, &ProtectedOperation::on_employee(Action::Delete, 1)),
            Decision::Denied(Denial::SelfDeleteForbidden)
        );
    }

    #[test]
    fn staff_can_edit_own_record_but_not_others() {
        let session = session_with(5, Role::STAFF);
        let edit_self = ProtectedOperation::on_employee(Action::Edit, 5);
        assert!(require(&session, &edit_self).is_allowed());
        assert_eq!(
            require(&session, &ProtectedOperation::on_employee(Action::Edit, 6)),
            Decision::Denied(Denial::NotAuthorized)
        );
    }

    #[test]
    fn staff_cannot_edit_other_entities() {
        let session = session_with(5, Role::STAFF);
        assert_eq!(
            require(&session, &ProtectedOperation::new(Entity::Vehicle, Action::Edit)),
            Decision::Denied(Denial::NotAuthorized)
        );
        let add_vehicle = ProtectedOperation::new(Entity::Vehicle, Action::Add);
        assert!(require(&session, &add_vehicle).is_allowed());
    }

    #[test]
    fn supervisor_edits_any_employee_but_cannot_delete() {
        let session = session_with(2, Role::SUPERVISOR);
        let edit_other = ProtectedOperation::on_employee(Action::Edit, 9);
        assert!(require(&session, &edit_other).is_allowed());
        assert_eq!(
            require(&session, &ProtectedOperation::on_employee(Action::Delete, 9)),
            Decision::Denied(Denial::NotAuthorized)
        );
    }

    #[test]
    fn unrecognized_role_only_keeps_self_edit() {
        let session = session_with(4, Role::Unrecognized("contador".to_string()));
        assert_eq!(
            require(&session, &ProtectedOperation::new(Entity::Customer, Action::View)),
            Decision::Denied(Denial::NotAuthorized)
        );
        let edit_self = ProtectedOperation::on_employee(Action::Edit, 4);
        assert!(require(&session, &edit_self).is_allowed());
    }

    #[test]
    fn unknown_keyword_is_rejected_not_downgraded() {
        let session = session_with(1, Role::CHIEF);
        assert_eq!(
            require_keyword(&session, Entity::Sale, "purge", None),
            Decision::Denied(Denial::UnsupportedAction("purge".to_string()))
        );
        assert!(require_keyword(&session, Entity::Sale, "delete", None).is_allowed());
    }

    #[test]
    fn unknown_keyword_from_anonymous_is_not_authenticated() {
        let session = SessionIdentity::default();
        assert_eq!(
            require_keyword(&session, Entity::Sale, "purge", None),
            Decision::Denied(Denial::NotAuthenticated)
        );
    }

    #[test]
    fn chief_is_assignable_only_before_first_chief_or_by_chief() {
        assert_eq!(
            assignable_roles(false, false),
            vec![CanonicalRole::Chief, CanonicalRole::Supervisor, CanonicalRole::Staff]
        );
        assert_eq!(
            assignable_roles(true, false),
            vec![CanonicalRole::Supervisor, CanonicalRole::Staff]
        );
        assert!(assignable_roles(true, true).contains(&CanonicalRole::Chief));
    }

    #[test]
    fn role_assignment_rejects_chief_from_non_chief_once_chief_exists() {
        let supervisor = session_with(2, Role::SUPERVISOR);
        assert_eq!(
            require_role_assignment(&supervisor, Some("chief"), true),
            Err(Denial::RoleNotPermitted)
        );
        assert_eq!(
            require_role_assignment(&supervisor, Some("staff"), true),
            Ok(CanonicalRole::Staff)
        );

        let chief = session_with(1, Role::CHIEF);
        assert_eq!(
            require_role_assignment(&chief, Some("chief"), true),
            Ok(CanonicalRole::Chief)
        );
    }

    #[test]
    fn role_assignment_rejects_missing_and_unrecognized_roles() {
        let chief = session_with(1, Role::CHIEF);
        assert_eq!(
            require_role_assignment(&chief, None, true),
            Err(Denial::RoleNotPermitted)
        );
        assert_eq!(
            require_role_assignment(&chief, Some("contador"), true),
            Err(Denial::RoleNotPermitted)
        );
    }

    #[test]
    fn non_chief_cannot_change_a_chief_record() {
        let supervisor = session_with(2, Role::SUPERVISOR);
        assert_eq!(
            require_record_change(&supervisor, 1, Some(&Role::CHIEF), None),
            Err(Denial::NotAuthorized)
        );
        assert_eq!(
            require_record_change(
                &supervisor,
                1,
                Some(&Role::CHIEF),
                Some(CanonicalRole::Staff)
            ),
            Err(Denial::NotAuthorized)
        );
        assert_eq!(
            require_record_change(&supervisor, 3, Some(&Role::STAFF), None),
            Ok(())
        );
    }

    #[test]
    fn non_chief_cannot_change_own_role() {
        let staff = session_with(5, Role::STAFF);
        assert_eq!(
            require_record_change(
                &staff,
                5,
                Some(&Role::STAFF),
                Some(CanonicalRole::Supervisor)
            ),
            Err(Denial::RoleNotPermitted)
        );
        assert_eq!(
            require_record_change(&staff, 5, None, Some(CanonicalRole::Staff)),
            Ok(())
        );
        assert_eq!(
            require_record_change(&staff, 5, Some(&Role::STAFF), None),
            Ok(())
        );
    }

    #[test]
    fn chief_may_change_any_record() {
        let chief = session_with(1, Role::CHIEF);
        assert_eq!(
            require_record_change(
                &chief,
                7,
                Some(&Role::CHIEF),
                Some(CanonicalRole::Staff)
            ),
            Ok(())
        );
        assert_eq!(
            require_record_change(
                &chief,
                1,
                Some(&Role::CHIEF),
                Some(CanonicalRole::Supervisor)
            ),
            Ok(())
        );
    }

    #[test]
    fn role_assignment_resolves_legacy_aliases() {
        let anonymous = SessionIdentity::default();
        assert_eq!(
            require_role_assignment(&anonymous, Some("gerente"), false),
            Ok(CanonicalRole::Chief)
        );
    }
}
