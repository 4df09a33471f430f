use backoffice_auth_core::auth::hashing::hash_password;
use backoffice_auth_core::db::{open_db_in_memory, DbError};
use backoffice_auth_core::{
    AuthError, AuthService, CanonicalRole, CredentialStore, Identity, IdentityId, NewIdentity,
    RepoError, RepoResult, Role, SessionIdentity, SqliteCredentialStore,
};
use rusqlite::Connection;

fn seed(conn: &Connection, email: &str, password: &str, role: Option<&str>) -> IdentityId {
    SqliteCredentialStore::new(conn)
        .insert(&NewIdentity {
            name: "Marta Ruiz".to_string(),
            national_id: format!("NID-{email}"),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: role.map(str::to_string),
            address: None,
            department: None,
            salary: None,
        })
        .unwrap()
}

/// Delegates to SQLite but fails every role/password update.
struct UpdateFailingStore<'conn>(SqliteCredentialStore<'conn>);

impl CredentialStore for UpdateFailingStore<'_> {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        self.0.find_by_email(email)
    }
    fn find_by_id(&self, id: IdentityId) -> RepoResult<Option<Identity>> {
        self.0.find_by_id(id)
    }
    fn exists_by_email_or_national_id(&self, email: &str, national_id: &str) -> RepoResult<bool> {
        self.0.exists_by_email_or_national_id(email, national_id)
    }
    fn count_with_role(&self, role: CanonicalRole) -> RepoResult<u64> {
        self.0.count_with_role(role)
    }
    fn insert(&self, identity: &NewIdentity) -> RepoResult<IdentityId> {
        self.0.insert(identity)
    }
    fn update_role_and_maybe_password(
        &self,
        _id: IdentityId,
        _role: &str,
        _password_hash: Option<&str>,
    ) -> RepoResult<()> {
        Err(RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery)))
    }
    fn delete(&self, id: IdentityId) -> RepoResult<()> {
        self.0.delete(id)
    }
}

#[test]
fn unknown_email_is_invalid_credentials() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    let err = service
        .login(&mut session, "ghost@example.com", "ab12")
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!session.is_authenticated());
}

#[test]
fn wrong_password_is_invalid_credentials() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, "marta@example.com", "ab12", Some("staff"));
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    let err = service
        .login(&mut session, "marta@example.com", "ab13")
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!session.is_authenticated());
}

#[test]
fn correct_credentials_authenticate_with_normalized_role() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, "marta@example.com", "ab12", Some("gerente"));
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    service
        .login(&mut session, " Marta@Example.com", "ab12")
        .unwrap();

    let identity = session.identity().unwrap();
    assert_eq!(identity.employee_id, id);
    assert_eq!(identity.employee_name, "Marta Ruiz");
    assert_eq!(identity.role, Role::CHIEF);
}

#[test]
fn legacy_row_without_password_cannot_log_in() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO employees (name, national_id, email) VALUES ('Old', '1', 'old@example.com');",
        [],
    )
    .unwrap();
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    let err = service
        .login(&mut session, "old@example.com", "")
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[test]
fn absent_role_logs_in_as_staff_and_backfills() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, "marta@example.com", "ab12", None);
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    service
        .login(&mut session, "marta@example.com", "ab12")
        .unwrap();
    assert_eq!(session.role(), Some(&Role::STAFF));

    let stored = SqliteCredentialStore::new(&conn)
        .find_by_id(id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.role.as_deref(), Some("staff"));
}

#[test]
fn failed_backfill_does_not_block_login() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, "marta@example.com", "ab12", None);
    let service = AuthService::new(UpdateFailingStore(SqliteCredentialStore::new(&conn)));
    let mut session = SessionIdentity::default();

    service
        .login(&mut session, "marta@example.com", "ab12")
        .unwrap();
    assert_eq!(session.role(), Some(&Role::STAFF));

    let stored = SqliteCredentialStore::new(&conn)
        .find_by_id(id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, None);
}

#[test]
fn unrecognized_role_is_kept_verbatim_without_backfill() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, "marta@example.com", "ab12", Some("contador"));
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();

    service
        .login(&mut session, "marta@example.com", "ab12")
        .unwrap();
    assert_eq!(
        session.role(),
        Some(&Role::Unrecognized("contador".to_string()))
    );
    let stored = SqliteCredentialStore::new(&conn)
        .find_by_id(id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.role.as_deref(), Some("contador"));
}

#[test]
fn logout_clears_session_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, "marta@example.com", "ab12", Some("staff"));
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();
    service
        .login(&mut session, "marta@example.com", "ab12")
        .unwrap();

    service.logout(&mut session);
    assert_eq!(session, SessionIdentity::Anonymous);
    service.logout(&mut session);
    assert_eq!(session, SessionIdentity::Anonymous);
}

#[test]
fn failed_login_leaves_existing_session_untouched() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, "marta@example.com", "ab12", Some("supervisor"));
    let service = AuthService::new(SqliteCredentialStore::new(&conn));
    let mut session = SessionIdentity::default();
    service
        .login(&mut session, "marta@example.com", "ab12")
        .unwrap();
    let before = session.clone();

    service
        .login(&mut session, "marta@example.com", "wrong1")
        .unwrap_err();
    assert_eq!(session, before);
}
