//! Static role × action permission matrix.
//!
//! # Invariants
//! - `chief` is allowed every action without consulting the table.
//! - Roles without a table entry (absent or unrecognized) are denied everything.
//! - Only the four action keywords `view|add|edit|delete` are accepted.

use crate::model::role::{CanonicalRole, Role};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Generic CRUD action requested by a back-office handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Self::View, Self::Add, Self::Edit, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Parses an exact action keyword. Unknown keywords are rejected, never
    /// mapped onto a weaker action.
    pub fn parse(keyword: &str) -> Result<Self, UnsupportedAction> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == keyword)
            .ok_or_else(|| UnsupportedAction(keyword.to_string()))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action keyword outside `view|add|edit|delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedAction(pub String);

impl Display for UnsupportedAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported action keyword: `{}`", self.0)
    }
}

impl Error for UnsupportedAction {}

/// Table rows for non-chief canonical roles: (view, add, edit, delete).
fn matrix_row(role: CanonicalRole) -> [bool; 4] {
    match role {
        CanonicalRole::Chief => [true; 4],
        CanonicalRole::Supervisor => [true, true, true, false],
        CanonicalRole::Staff => [true, true, false, false],
    }
}

/// Returns whether `role` may perform `action` on any entity.
pub fn allowed(role: Option<&Role>, action: Action) -> bool {
    let Some(canonical) = role.and_then(Role::canonical) else {
        return false;
    };
    if canonical == CanonicalRole::Chief {
        return true;
    }

    let column = match action {
        Action::View => 0,
        Action::Add => 1,
        Action::Edit => 2,
        Action::Delete => 3,
    };
    matrix_row(canonical)[column]
}

#[cfg(test)]
mod tests {
    use super::{allowed, Action, UnsupportedAction};
    use crate::model::role::Role;

    #[test]
    fn chief_is_allowed_every_action() {
        for action in Action::ALL {
            assert!(allowed(Some(&Role::CHIEF), action), "{action}");
        }
    }

    #[test]
    fn supervisor_cannot_delete() {
        assert!(allowed(Some(&Role::SUPERVISOR), Action::View));
        assert!(allowed(Some(&Role::SUPERVISOR), Action::Add));
        assert!(allowed(Some(&Role::SUPERVISOR), Action::Edit));
        assert!(!allowed(Some(&Role::SUPERVISOR), Action::Delete));
    }

    #[test]
    fn staff_can_only_view_and_add() {
        assert!(allowed(Some(&Role::STAFF), Action::View));
        assert!(allowed(Some(&Role::STAFF), Action::Add));
        assert!(!allowed(Some(&Role::STAFF), Action::Edit));
        assert!(!allowed(Some(&Role::STAFF), Action::Delete));
    }

    #[test]
    fn absent_and_unrecognized_roles_are_denied_everything() {
        let unknown = Role::Unrecognized("contador".to_string());
        for action in Action::ALL {
            assert!(!allowed(None, action));
            assert!(!allowed(Some(&unknown), action));
        }
    }

    #[test]
    fn parse_accepts_exact_keywords_only() {
        assert_eq!(Action::parse("delete"), Ok(Action::Delete));
        assert_eq!(
            Action::parse("purge"),
            Err(UnsupportedAction("purge".to_string()))
        );
        assert_eq!(
            Action::parse("View"),
            Err(UnsupportedAction("View".to_string()))
        );
    }
}
