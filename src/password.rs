use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;

const SALT_LENGTH: usize = argon2::password_hash::Salt::RECOMMENDED_LENGTH;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("random salt generation failed: {0}")]
    Salt(String),
    #[error("password hashing error: {0}")]
    Hash(String),
}

impl From<argon2::password_hash::Error> for PasswordError {
    fn from(err: argon2::password_hash::Error) -> Self {
        PasswordError::Hash(err.to_string())
    }
}

/// Hash a password with Argon2id and a random salt. The PHC string is what
/// gets stored in `users.password`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    OsRng.try_fill_bytes(&mut salt_bytes).map_err(|err| PasswordError::Salt(err.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)?;
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Returns `Ok(false)` for a wrong password and `Err` only when the stored
/// hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(password_hash)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
