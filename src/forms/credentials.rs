use thiserror::Error;

use crate::{auth::password, error::AppError};

use super::{errors::FormErrors, fields::required_text};

pub const PASSWORD1: &str = "password1";
pub const PASSWORD2: &str = "password2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Passwords don't match")]
    PasswordMismatch,
}

/// Confirms the second password entry against the first.
///
/// Only two non-empty, different values fail. Empty values pass through
/// untouched; the required-field check runs separately.
pub fn validate_confirmation<'a>(
    password1: &str,
    password2: &'a str,
) -> Result<&'a str, CredentialError> {
    if !password1.is_empty() && !password2.is_empty() && password1 != password2 {
        return Err(CredentialError::PasswordMismatch);
    }
    Ok(password2)
}

/// A confirmed plaintext password. Dropped as soon as it is hashed.
pub struct ConfirmedPassword(String);

impl ConfirmedPassword {
    pub fn hash(self) -> Result<String, AppError> {
        password::hash_password(&self.0)
    }
}

impl std::fmt::Debug for ConfirmedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConfirmedPassword(***)")
    }
}

/// Required checks on both entries, then the confirmation. Mismatch is
/// reported on `password2`.
pub fn clean_password_pair(
    errors: &mut FormErrors,
    password1: Option<&str>,
    password2: Option<&str>,
) -> Option<ConfirmedPassword> {
    let first = required_text(errors, PASSWORD1, password1);
    let second = required_text(errors, PASSWORD2, password2);

    let mismatch = validate_confirmation(
        first.as_deref().unwrap_or_default(),
        second.as_deref().unwrap_or_default(),
    )
    .err();
    match (mismatch, first, second) {
        (Some(err), _, _) => {
            errors.add(PASSWORD2, err.to_string());
            None
        }
        (None, Some(first), Some(_)) => Some(ConfirmedPassword(first)),
        _ => None,
    }
}
