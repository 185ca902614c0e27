use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;
use serde::Serialize;

use crate::error::AppError;

/// Prefix marking an account that cannot log in with a password.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

pub const NO_PASSWORD_SET: &str = "No password set.";
pub const UNKNOWN_HASH_FORMAT: &str = "Invalid password format or unknown hashing algorithm.";

const VISIBLE_PREFIX_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::bad_request(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Read-only view of a stored hash. Salt and digest are masked so the
/// summary can be shown to operators without exposing the hash itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PasswordHashSummary {
    Hashed {
        algorithm: String,
        version: Option<u32>,
        params: Vec<(String, String)>,
        salt: String,
        hash: String,
    },
    NotSet { message: &'static str },
    Unknown { message: &'static str },
}

impl PasswordHashSummary {
    pub fn from_hash(stored: &str) -> Self {
        if stored.is_empty() || stored.starts_with(UNUSABLE_PASSWORD_PREFIX) {
            return Self::NotSet {
                message: NO_PASSWORD_SET,
            };
        }

        let Ok(parsed) = PasswordHash::new(stored) else {
            return Self::Unknown {
                message: UNKNOWN_HASH_FORMAT,
            };
        };

        Self::Hashed {
            algorithm: parsed.algorithm.as_str().to_string(),
            version: parsed.version,
            params: parsed
                .params
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.as_str().to_string()))
                .collect(),
            salt: parsed
                .salt
                .map(|salt| mask(salt.as_str()))
                .unwrap_or_default(),
            hash: parsed
                .hash
                .map(|output| mask(&output.to_string()))
                .unwrap_or_default(),
        }
    }
}

fn mask(value: &str) -> String {
    let shown: String = value.chars().take(VISIBLE_PREFIX_LEN).collect();
    let hidden = value.chars().count().saturating_sub(VISIBLE_PREFIX_LEN);
    format!("{shown}{}", "*".repeat(hidden))
}

#[cfg(test)]
mod tests {
    use super::{
        NO_PASSWORD_SET, PasswordHashSummary, UNKNOWN_HASH_FORMAT, hash_password, verify_password,
    };

    #[test]
    fn hash_is_salted_and_verifies() {
        let first = hash_password("Secret123").expect("hash should succeed");
        let second = hash_password("Secret123").expect("hash should succeed");

        assert_ne!(first, "Secret123");
        assert_ne!(first, second);
        assert!(verify_password("Secret123", &first).expect("verify should run"));
        assert!(!verify_password("secret123", &first).expect("verify should run"));
    }

    #[test]
    fn summary_masks_salt_and_digest() {
        let stored = hash_password("Secret123").expect("hash should succeed");
        let PasswordHashSummary::Hashed {
            algorithm,
            salt,
            hash,
            params,
            ..
        } = PasswordHashSummary::from_hash(&stored)
        else {
            panic!("expected a hashed summary");
        };

        assert_eq!(algorithm, "argon2id");
        assert!(salt.ends_with('*'));
        assert!(hash.ends_with('*'));
        assert!(!stored.contains(&hash));
        assert!(params.iter().any(|(name, _)| name == "m"));
    }

    #[test]
    fn summary_reports_missing_and_unknown_hashes() {
        assert_eq!(
            PasswordHashSummary::from_hash(""),
            PasswordHashSummary::NotSet {
                message: NO_PASSWORD_SET
            }
        );
        assert_eq!(
            PasswordHashSummary::from_hash("!unusable"),
            PasswordHashSummary::NotSet {
                message: NO_PASSWORD_SET
            }
        );
        assert_eq!(
            PasswordHashSummary::from_hash("md5$plain"),
            PasswordHashSummary::Unknown {
                message: UNKNOWN_HASH_FORMAT
            }
        );
    }
}
