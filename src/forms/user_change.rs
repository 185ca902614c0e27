use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::Deserialize;

use crate::{auth::PasswordHashSummary, db::entities::user};

use super::{
    credentials::{ConfirmedPassword, clean_password_pair},
    errors::FormErrors,
    fields::clean_datetime,
    profile::{RawProfile, UserProfile},
};

/// Change-form submission. Unchecked boxes arrive as `false`. A `password`
/// key, if sent, is not part of this form and is dropped by the
/// deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserChangeInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub user_type: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub date_joined: Option<String>,
}

impl UserChangeInput {
    pub fn email_candidate(&self) -> Option<String> {
        let mut scratch = FormErrors::new();
        super::fields::clean_email(&mut scratch, "email", self.email.as_deref())
    }
}

/// The read-only password entry shown on the change page.
pub fn render_password_field(user: &user::Model) -> PasswordHashSummary {
    PasswordHashSummary::from_hash(&user.password_hash)
}

#[derive(Debug, Clone)]
pub struct UserChangeForm {
    input: UserChangeInput,
}

impl UserChangeForm {
    pub fn new(input: UserChangeInput) -> Self {
        Self { input }
    }

    pub fn clean(self, email_taken: bool) -> Result<UserChanges, FormErrors> {
        let input = self.input;
        let mut errors = FormErrors::new();

        let profile = UserProfile::clean(
            &mut errors,
            RawProfile {
                email: input.email.as_deref(),
                first_name: input.first_name.as_deref(),
                last_name: input.last_name.as_deref(),
                phone_number: input.phone_number.as_deref(),
                profile_picture: input.profile_picture.as_deref(),
                user_type: input.user_type.as_deref(),
                is_active: input.is_active,
                is_staff: input.is_staff,
                is_superuser: input.is_superuser,
            },
            email_taken,
        );
        let last_login = clean_datetime(&mut errors, "last_login", input.last_login.as_deref());
        let date_joined = clean_datetime(&mut errors, "date_joined", input.date_joined.as_deref());

        match (profile, last_login, date_joined) {
            (Some(profile), Some(last_login), Some(date_joined)) if errors.is_empty() => {
                Ok(UserChanges {
                    profile,
                    last_login,
                    date_joined,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validated edits. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub profile: UserProfile,
    pub last_login: Option<DateTime<FixedOffset>>,
    /// Blank keeps the stored join date.
    pub date_joined: Option<DateTime<FixedOffset>>,
}

impl UserChanges {
    pub fn apply(self, active: &mut user::ActiveModel) {
        self.profile.apply(active);
        active.last_login = Set(self.last_login);
        if let Some(date_joined) = self.date_joined {
            active.date_joined = Set(date_joined);
        }
    }
}

/// Admin-side password reset: two entries, no old password.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminPasswordChangeInput {
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl std::fmt::Debug for AdminPasswordChangeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminPasswordChangeInput { .. }")
    }
}

#[derive(Debug, Clone)]
pub struct AdminPasswordChangeForm {
    input: AdminPasswordChangeInput,
}

impl AdminPasswordChangeForm {
    pub fn new(input: AdminPasswordChangeInput) -> Self {
        Self { input }
    }

    pub fn clean(self) -> Result<ConfirmedPassword, FormErrors> {
        let mut errors = FormErrors::new();
        let confirmed = clean_password_pair(
            &mut errors,
            self.input.password1.as_deref(),
            self.input.password2.as_deref(),
        );
        match confirmed {
            Some(confirmed) if errors.is_empty() => Ok(confirmed),
            _ => Err(errors),
        }
    }
}
