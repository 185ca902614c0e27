use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::{
    db::{
        dao::{DaoBase, UserDao},
        entities::user,
    },
    error::AppError,
};

use super::{
    credentials::{ConfirmedPassword, clean_password_pair},
    errors::FormErrors,
    profile::{RawProfile, UserProfile, email_conflict},
};

/// Add-form submission. Accounts start active unless told otherwise.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UserCreationInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub user_type: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl Default for UserCreationInput {
    fn default() -> Self {
        Self {
            email: None,
            first_name: None,
            last_name: None,
            phone_number: None,
            profile_picture: None,
            user_type: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            password1: None,
            password2: None,
        }
    }
}

impl std::fmt::Debug for UserCreationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreationInput")
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .finish_non_exhaustive()
    }
}

impl UserCreationInput {
    /// Email as submitted, for the uniqueness lookup before cleaning.
    pub fn email_candidate(&self) -> Option<String> {
        let mut scratch = FormErrors::new();
        super::fields::clean_email(&mut scratch, "email", self.email.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct UserCreationForm {
    input: UserCreationInput,
}

impl UserCreationForm {
    pub fn new(input: UserCreationInput) -> Self {
        Self { input }
    }

    /// Field validation plus the password confirmation. Every error is
    /// collected before returning.
    pub fn clean(self, email_taken: bool) -> Result<CleanedUserCreation, FormErrors> {
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
        let password = clean_password_pair(
            &mut errors,
            input.password1.as_deref(),
            input.password2.as_deref(),
        );

        match (profile, password) {
            (Some(profile), Some(password)) if errors.is_empty() => {
                Ok(CleanedUserCreation { profile, password })
            }
            _ => Err(errors),
        }
    }
}

/// A validated add-form submission. Still holds the plaintext password.
#[derive(Debug)]
pub struct CleanedUserCreation {
    profile: UserProfile,
    password: ConfirmedPassword,
}

impl CleanedUserCreation {
    /// Hashes the password and assembles the unsaved record. Touches no
    /// storage.
    pub fn build(self) -> Result<PendingUser, AppError> {
        let password_hash = self.password.hash()?;
        let email = self.profile.email.clone();
        let mut active = user::ActiveModel::default();
        self.profile.apply(&mut active);
        active.password_hash = sea_orm::Set(password_hash);
        active.last_login = sea_orm::Set(None);
        Ok(PendingUser { active, email })
    }
}

/// Unsaved account with its password already hashed.
#[derive(Debug)]
pub struct PendingUser {
    active: user::ActiveModel,
    email: String,
}

impl PendingUser {
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Single insert; the returned model carries the generated id. A unique
    /// index hit on `email` comes back as the form's field error.
    pub async fn persist<C>(self, dao: &UserDao<C>) -> Result<user::Model, AppError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        dao.create(self.active).await.map_err(email_conflict)
    }
}
