//! Form cleaning for the user admin pages.
//!
//! Forms only validate and assemble values. Storage happens in the service
//! layer, except for [`PendingUser::persist`], which is the single insert
//! for a new account.

pub mod address;
pub mod credentials;
mod errors;
pub mod fields;
mod profile;
mod user_change;
mod user_creation;

pub use address::{AddressChange, AddressFormInput, AddressInlineFormSet};
pub use credentials::{ConfirmedPassword, CredentialError, validate_confirmation};
pub use errors::{FormErrors, INVALID_CHOICE, INVALID_EMAIL, REQUIRED};
pub use profile::{UNIQUE_EMAIL, UserProfile, email_conflict};
pub use user_change::{
    AdminPasswordChangeForm, AdminPasswordChangeInput, UserChangeForm, UserChangeInput,
    UserChanges, render_password_field,
};
pub use user_creation::{CleanedUserCreation, PendingUser, UserCreationForm, UserCreationInput};
