//! Credential store contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up employees by email or id for authentication.
//! - Answer the uniqueness and chief-count questions registration needs.
//! - Persist new employees and role/password updates.
//!
//! # Invariants
//! - Emails are matched trimmed and case-insensitively.
//! - Role counts include legacy aliases of the requested canonical role.
//! - Unique-constraint races on insert surface as `Duplicate`, not `Db`.

use crate::db::DbError;
use crate::model::identity::{normalize_email, Identity, IdentityId, NewIdentity};
use crate::model::role::{aliases_for, CanonicalRole};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    national_id,
    email,
    password_hash,
    role,
    address,
    department,
    salary
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Credential store failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(IdentityId),
    /// Email or national id already taken (detected by constraint).
    Duplicate,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Duplicate => write!(f, "employee email or national id already exists"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Credential store consumed by the auth and employee services.
pub trait CredentialStore {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>>;
    fn find_by_id(&self, id: IdentityId) -> RepoResult<Option<Identity>>;
    fn exists_by_email_or_national_id(&self, email: &str, national_id: &str) -> RepoResult<bool>;
    fn count_with_role(&self, role: CanonicalRole) -> RepoResult<u64>;
    fn insert(&self, identity: &NewIdentity) -> RepoResult<IdentityId>;
    fn update_role_and_maybe_password(
        &self,
        id: IdentityId,
        role: &str,
        password_hash: Option<&str>,
    ) -> RepoResult<()>;
    fn delete(&self, id: IdentityId) -> RepoResult<()>;
}

/// SQLite-backed credential store over the `employees` table.
pub struct SqliteCredentialStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCredentialStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CredentialStore for SqliteCredentialStore<'_> {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        let identity = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1;"),
                [normalize_email(email)],
                parse_identity_row,
            )
            .optional()?;
        Ok(identity)
    }

    fn find_by_id(&self, id: IdentityId) -> RepoResult<Option<Identity>> {
        let identity = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_identity_row,
            )
            .optional()?;
        Ok(identity)
    }

    fn exists_by_email_or_national_id(&self, email: &str, national_id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM employees WHERE email = ?1 OR national_id = ?2
            );",
            params![normalize_email(email), national_id.trim()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count_with_role(&self, role: CanonicalRole) -> RepoResult<u64> {
        let tokens = aliases_for(role);
        let placeholders = vec!["?"; tokens.len()].join(", ");
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM employees WHERE lower(trim(role)) IN ({placeholders});"
            ),
            params_from_iter(tokens),
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn insert(&self, identity: &NewIdentity) -> RepoResult<IdentityId> {
        let result = self.conn.execute(
            "INSERT INTO employees (
                name,
                national_id,
                email,
                password_hash,
                role,
                address,
                department,
                salary
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                identity.name.trim(),
                identity.national_id.trim(),
                normalize_email(&identity.email),
                identity.password_hash.as_str(),
                identity.role.as_deref(),
                identity.address.as_deref(),
                identity.department.as_deref(),
                identity.salary,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_constraint_violation(&err) => Err(RepoError::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    fn update_role_and_maybe_password(
        &self,
        id: IdentityId,
        role: &str,
        password_hash: Option<&str>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                role = ?1,
                password_hash = COALESCE(?2, password_hash),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![role, password_hash, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: IdentityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_identity_row(row: &Row<'_>) -> rusqlite::Result<Identity> {
    Ok(Identity {
        id: row.get("id")?,
        name: row.get("name")?,
        national_id: row.get("national_id")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        role: row.get("role")?,
        address: row.get("address")?,
        department: row.get("department")?,
        salary: row.get("salary")?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}
