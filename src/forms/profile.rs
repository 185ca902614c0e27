use sea_orm::{Set, SqlErr};

use crate::{
    auth::UserType,
    db::{dao::DaoLayerError, entities::user},
    error::AppError,
};

use super::{
    errors::FormErrors,
    fields::{blank_text, clean_email, clean_user_type, optional_text},
};

pub const UNIQUE_EMAIL: &str = "User with this Email already exists.";

/// Turns a unique index hit on `email` into the uniqueness field error. Two
/// submissions can both pass the lookup before either row is written.
pub fn email_conflict(err: DaoLayerError) -> AppError {
    match &err {
        DaoLayerError::Db(db_err)
            if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
        {
            AppError::validation(FormErrors::single("email", UNIQUE_EMAIL))
        }
        _ => err.into(),
    }
}

/// Submitted profile values before cleaning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawProfile<'a> {
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub profile_picture: Option<&'a str>,
    pub user_type: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Profile fields shared by the add and change forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserProfile {
    /// Collects every field error; `email_taken` adds the uniqueness error.
    pub fn clean(errors: &mut FormErrors, raw: RawProfile<'_>, email_taken: bool) -> Option<Self> {
        let email = clean_email(errors, "email", raw.email);
        if email.is_some() && email_taken {
            errors.add("email", UNIQUE_EMAIL);
        }
        let user_type = clean_user_type(errors, "user_type", raw.user_type);

        Some(Self {
            email: email.filter(|_| !email_taken)?,
            first_name: blank_text(raw.first_name),
            last_name: blank_text(raw.last_name),
            phone_number: optional_text(raw.phone_number),
            profile_picture: optional_text(raw.profile_picture),
            user_type: user_type?,
            is_active: raw.is_active,
            is_staff: raw.is_staff,
            is_superuser: raw.is_superuser,
        })
    }

    /// Writes the profile columns. The stored hash is left alone.
    pub fn apply(self, active: &mut user::ActiveModel) {
        active.email = Set(self.email);
        active.first_name = Set(self.first_name);
        active.last_name = Set(self.last_name);
        active.phone_number = Set(self.phone_number);
        active.profile_picture = Set(self.profile_picture);
        active.user_type = Set(self.user_type.as_str().to_string());
        active.is_active = Set(self.is_active);
        active.is_staff = Set(self.is_staff);
        active.is_superuser = Set(self.is_superuser);
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::UserType;
    use crate::forms::errors::{FormErrors, INVALID_CHOICE, REQUIRED};

    use super::{RawProfile, UNIQUE_EMAIL, UserProfile};

    #[test]
    fn cleans_and_trims_every_field() {
        let mut errors = FormErrors::new();
        let profile = UserProfile::clean(
            &mut errors,
            RawProfile {
                email: Some(" ann@Example.com "),
                first_name: Some(" Ann "),
                phone_number: Some("  "),
                user_type: Some("vendor"),
                is_active: true,
                ..RawProfile::default()
            },
            false,
        )
        .expect("profile should clean");

        assert!(errors.is_empty());
        assert_eq!(profile.email, "ann@example.com");
        assert_eq!(profile.first_name, "Ann");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.phone_number, None);
        assert_eq!(profile.user_type, UserType::Vendor);
    }

    #[test]
    fn reports_all_field_errors_together() {
        let mut errors = FormErrors::new();
        let profile = UserProfile::clean(
            &mut errors,
            RawProfile {
                user_type: Some("robot"),
                ..RawProfile::default()
            },
            false,
        );

        assert!(profile.is_none());
        assert_eq!(errors.field("email"), [REQUIRED]);
        assert_eq!(errors.field("user_type"), [INVALID_CHOICE]);
    }

    #[test]
    fn taken_email_is_a_field_error() {
        let mut errors = FormErrors::new();
        let profile = UserProfile::clean(
            &mut errors,
            RawProfile {
                email: Some("ann@example.com"),
                ..RawProfile::default()
            },
            true,
        );

        assert!(profile.is_none());
        assert_eq!(errors.field("email"), [UNIQUE_EMAIL]);
    }
}
