//! Password strength rules for registration and password changes.
//!
//! # Invariants
//! - A valid password is at least 4 characters of ASCII letters and digits,
//!   with at least one of each.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_PASSWORD_LEN: usize = 4;

static ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid alphanumeric regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));
static LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").expect("valid letter regex"));

/// First password rule a candidate breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicyViolation {
    Missing,
    TooShort,
    InvalidCharacters,
    MissingDigit,
    MissingLetter,
}

impl Display for PasswordPolicyViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "password is required"),
            Self::TooShort => write!(
                f,
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            ),
            Self::InvalidCharacters => write!(f, "password may only contain letters and digits"),
            Self::MissingDigit => write!(f, "password must contain at least one digit"),
            Self::MissingLetter => write!(f, "password must contain at least one letter"),
        }
    }
}

impl Error for PasswordPolicyViolation {}

/// Checks `candidate` against every rule, in order.
pub fn validate(candidate: Option<&str>) -> Result<(), PasswordPolicyViolation> {
    let candidate = match candidate {
        Some(value) if !value.is_empty() => value,
        _ => return Err(PasswordPolicyViolation::Missing),
    };

    if candidate.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordPolicyViolation::TooShort);
    }
    if !ALPHANUMERIC_RE.is_match(candidate) {
        return Err(PasswordPolicyViolation::InvalidCharacters);
    }
    if !DIGIT_RE.is_match(candidate) {
        return Err(PasswordPolicyViolation::MissingDigit);
    }
    if !LETTER_RE.is_match(candidate) {
        return Err(PasswordPolicyViolation::MissingLetter);
    }
    Ok(())
}

pub fn is_valid(candidate: Option<&str>) -> bool {
    validate(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{is_valid, validate, PasswordPolicyViolation};

    #[test]
    fn accepts_short_mixed_password() {
        assert!(is_valid(Some("ab12")));
        assert!(is_valid(Some("Z9z9z9")));
    }

    #[test]
    fn rejects_password_without_digit() {
        assert_eq!(
            validate(Some("abcd")),
            Err(PasswordPolicyViolation::MissingDigit)
        );
    }

    #[test]
    fn rejects_password_without_letter() {
        assert_eq!(
            validate(Some("1234")),
            Err(PasswordPolicyViolation::MissingLetter)
        );
    }

    #[test]
    fn rejects_too_short_password() {
        assert_eq!(validate(Some("12")), Err(PasswordPolicyViolation::TooShort));
    }

    #[test]
    fn rejects_symbols_and_whitespace() {
        assert_eq!(
            validate(Some("ab#1")),
            Err(PasswordPolicyViolation::InvalidCharacters)
        );
        assert_eq!(
            validate(Some("ab 12")),
            Err(PasswordPolicyViolation::InvalidCharacters)
        );
    }

    #[test]
    fn rejects_non_ascii_letters() {
        assert!(!is_valid(Some("ñandu1")));
    }

    #[test]
    fn rejects_missing_or_empty_input() {
        assert_eq!(validate(None), Err(PasswordPolicyViolation::Missing));
        assert_eq!(validate(Some("")), Err(PasswordPolicyViolation::Missing));
    }
}
