//! Per-operation service entry points.
//!
//! Each call opens its own connection, runs one use-case, and drops the
//! connection before returning, on success and error paths alike.

use crate::db::open_db;
use crate::error::{AuthError, AuthResult};
use crate::repo::identity_repo::SqliteCredentialStore;
use crate::service::auth_service::AuthService;
use crate::service::employee_service::EmployeeService;
use std::path::Path;

/// Runs `f` against an `AuthService` backed by a fresh connection.
pub fn with_auth_service<T>(
    db_path: impl AsRef<Path>,
    f: impl FnOnce(&AuthService<SqliteCredentialStore<'_>>) -> AuthResult<T>,
) -> AuthResult<T> {
    let conn = open_db(db_path).map_err(|err| AuthError::StoreUnavailable(Box::new(err)))?;
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    f(&service)
}

/// Runs `f` against an `EmployeeService` backed by a fresh connection.
pub fn with_employee_service<T>(
    db_path: impl AsRef<Path>,
    f: impl FnOnce(&EmployeeService<SqliteCredentialStore<'_>>) -> AuthResult<T>,
) -> AuthResult<T> {
    let conn = open_db(db_path).map_err(|err| AuthError::StoreUnavailable(Box::new(err)))?;
    let service = EmployeeService::new(SqliteCredentialStore::new(&conn));
    f(&service)
}
