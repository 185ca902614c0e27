//! Cleaning helpers shared by the user and address forms.

use chrono::{DateTime, FixedOffset};
use validator::ValidateEmail;

use crate::auth::UserType;

use super::errors::{FormErrors, INVALID_CHOICE, INVALID_EMAIL, REQUIRED};

pub const INVALID_DATETIME: &str = "Enter a valid date/time.";

/// Trimmed value, or `None` when missing or blank.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Trimmed value; blank becomes an empty string.
pub fn blank_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

pub fn required_text(errors: &mut FormErrors, field: &str, value: Option<&str>) -> Option<String> {
    let value = optional_text(value);
    if value.is_none() {
        errors.add(field, REQUIRED);
    }
    value
}

/// Required email with a lowercased domain part.
pub fn clean_email(errors: &mut FormErrors, field: &str, value: Option<&str>) -> Option<String> {
    let email = required_text(errors, field, value)?;
    let normalized = email
        .validate_email()
        .then(|| email.rsplit_once('@'))
        .flatten()
        .map(|(local, domain)| format!("{local}@{}", domain.to_lowercase()));
    if normalized.is_none() {
        errors.add(field, INVALID_EMAIL);
    }
    normalized
}

/// Blank falls back to the default category.
pub fn clean_user_type(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
) -> Option<UserType> {
    match optional_text(value) {
        None => Some(UserType::default()),
        Some(raw) => match UserType::try_from(raw.as_str()) {
            Ok(user_type) => Some(user_type),
            Err(()) => {
                errors.add(field, INVALID_CHOICE);
                None
            }
        },
    }
}

/// RFC 3339 timestamp; blank is `Ok(None)`.
pub fn clean_datetime(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
) -> Option<Option<DateTime<FixedOffset>>> {
    match optional_text(value) {
        None => Some(None),
        Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Some(Some(parsed)),
            Err(_) => {
                errors.add(field, INVALID_DATETIME);
                None
            }
        },
    }
}
