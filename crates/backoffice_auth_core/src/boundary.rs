//! Transport-facing outcomes for guard decisions and service errors.
//!
//! # Responsibility
//! - Turn denials into a redirect target plus a user-facing message.
//! - Turn form errors into a re-display with secrets blanked.
//!
//! # Invariants
//! - Authorization denials always redirect; they never become a fault page.
//! - Re-displayed forms never carry passwords.
//! - Store failures surface as a generic message, never internal details.

use crate::auth::guard::{require_keyword, Decision, Denial};
use crate::error::AuthError;
use crate::model::entity::Entity;
use crate::model::identity::IdentityId;
use crate::service::Redisplayable;
use crate::session::SessionIdentity;
use log::error;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    pub message: String,
}

impl Redirect {
    /// Redirect for a guard denial on `entity`.
    pub fn for_denial(denial: &Denial, entity: Entity) -> Self {
        let to = match denial {
            Denial::NotAuthenticated => LOGIN_PATH,
            _ => entity.list_path(),
        };
        Self {
            to,
            message: denial.message().to_string(),
        }
    }
}

/// What the transport should do after a failed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<F> {
    Redirect(Redirect),
    Redisplay { message: String, form: F },
    Fault { message: String },
}

/// Single check entity handlers call before doing any work.
pub fn authorize(
    session: &SessionIdentity,
    entity: Entity,
    keyword: &str,
    target: Option<IdentityId>,
) -> Result<(), Redirect> {
    match require_keyword(session, entity, keyword, target) {
        Decision::Allowed => Ok(()),
        Decision::Denied(denial) => Err(Redirect::for_denial(&denial, entity)),
    }
}

/// Maps a service error to an outcome.
///
/// `form` is the submitted form when the failed operation had one; form
/// errors (credentials, validation, duplicates, role choice) re-display it.
pub fn outcome_for<F: Redisplayable>(
    err: &AuthError,
    entity: Entity,
    form: Option<&F>,
) -> Outcome<F> {
    let redisplay = matches!(
        err,
        AuthError::InvalidCredentials
            | AuthError::Validation(_)
            | AuthError::DuplicateIdentity
            | AuthError::RoleNotPermitted
    );
    if let (true, Some(form)) = (redisplay, form) {
        return Outcome::Redisplay {
            message: err.user_message(),
            form: form.without_secrets(),
        };
    }

    if let Some(denial) = err.denial() {
        return Outcome::Redirect(Redirect::for_denial(&denial, entity));
    }

    match err {
        AuthError::IdentityNotFound(_) => Outcome::Redirect(Redirect {
            to: entity.list_path(),
            message: err.user_message(),
        }),
        AuthError::StoreUnavailable(source) => {
            error!(
                "event=request_failed module=boundary status=error entity={} error={}",
                entity.as_str(),
                source
            );
            Outcome::Fault {
                message: err.user_message(),
            }
        }
        _ => Outcome::Fault {
            message: err.user_message(),
        },
    }
}
