//! Employee identity records.
//!
//! # Responsibility
//! - Define the stored employee shape used for authentication.
//! - Define the insert/update payloads accepted by the credential store.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `email` is stored trimmed and lowercased.
//! - `role` is the raw persisted value; only `model::role::normalize`
//!   interprets it.

use serde::Serialize;

/// Store-assigned employee identifier.
pub type IdentityId = i64;

/// Stored employee record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub national_id: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized out of the core.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Raw role as persisted; `None` for legacy rows created before roles.
    pub role: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

/// Insert payload for a new employee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdentity {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

/// Canonical storage form of an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
