//! Role normalization.
//!
//! # Responsibility
//! - Map raw persisted role strings (including legacy aliases) onto the
//!   closed `Role` enumeration.
//! - Be the only place that branches on raw role strings.
//!
//! # Invariants
//! - Every raw value normalizes to exactly one `Role` or to `None`.
//! - `normalize` is pure and idempotent over `Role::as_str()`.
//! - Unrecognized values pass through unchanged and carry no permissions.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Authorization tier used by the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    /// Top tier; implicitly allowed every action.
    Chief,
    Supervisor,
    Staff,
}

impl CanonicalRole {
    pub const ALL: [CanonicalRole; 3] = [Self::Chief, Self::Supervisor, Self::Staff];

    /// Stable lowercase token as persisted in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chief => "chief",
            Self::Supervisor => "supervisor",
            Self::Staff => "staff",
        }
    }
}

impl Display for CanonicalRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized role as held by a session.
///
/// `Unrecognized` keeps the raw value so it can be written back verbatim;
/// it never matches any permission matrix entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Canonical(CanonicalRole),
    Unrecognized(String),
}

impl Role {
    pub const CHIEF: Role = Role::Canonical(CanonicalRole::Chief);
    pub const SUPERVISOR: Role = Role::Canonical(CanonicalRole::Supervisor);
    pub const STAFF: Role = Role::Canonical(CanonicalRole::Staff);

    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(role) => role.as_str(),
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Returns the canonical tier, or `None` for unrecognized roles.
    pub fn canonical(&self) -> Option<CanonicalRole> {
        match self {
            Self::Canonical(role) => Some(*role),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_chief(&self) -> bool {
        self.canonical() == Some(CanonicalRole::Chief)
    }
}

impl From<CanonicalRole> for Role {
    fn from(value: CanonicalRole) -> Self {
        Self::Canonical(value)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored tokens that normalize onto a canonical role other than its own name.
const LEGACY_ALIASES: &[(&str, CanonicalRole)] = &[
    ("admin", CanonicalRole::Chief),
    ("gerente", CanonicalRole::Chief),
    ("compras", CanonicalRole::Supervisor),
    ("vendedor", CanonicalRole::Staff),
    ("almacenista", CanonicalRole::Staff),
    ("tecnico", CanonicalRole::Staff),
];

/// Normalizes one raw role value.
///
/// - `None`, empty, or whitespace-only input -> `None`.
/// - Canonical names and legacy aliases (trimmed, ASCII case-insensitive)
///   -> `Role::Canonical`.
/// - Anything else -> `Role::Unrecognized` holding the raw input unchanged.
pub fn normalize(raw: Option<&str>) -> Option<Role> {
    let raw = raw?;
    let key = raw.trim().to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(role) = parse_canonical(&key) {
        return Some(Role::Canonical(role));
    }

    let alias = LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, role)| Role::Canonical(*role));

    Some(alias.unwrap_or_else(|| Role::Unrecognized(raw.to_string())))
}

/// Parses an exact canonical token (no aliases, no trimming).
pub fn parse_canonical(value: &str) -> Option<CanonicalRole> {
    CanonicalRole::ALL
        .into_iter()
        .find(|role| role.as_str() == value)
}

/// Returns every stored token that normalizes onto `role`, canonical name first.
pub fn aliases_for(role: CanonicalRole) -> Vec<&'static str> {
    std::iter::once(role.as_str())
        .chain(
            LEGACY_ALIASES
                .iter()
                .filter(|(_, target)| *target == role)
                .map(|(alias, _)| *alias),
        )
        .collect()
}
