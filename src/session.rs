//! Password hashing and session-cookie helpers.
//!
//! The session cookie carries only the user id; the authenticated
//! principal is rebuilt from the database on every request by the
//! `ClientCtx` extractor.

use actix_session::Session;
use actix_web::error;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::SaltString;
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Session key holding the logged-in user's id.
pub const SESSION_USER_KEY: &str = "uid";

static ARGON2: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

pub fn get_argon2() -> &'static Argon2<'static> {
    &ARGON2
}

/// Hash a plain-text password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(ARGON2
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plain-text password against a stored hash.
/// An unparseable hash counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => ARGON2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash failed to parse: {}", e);
            false
        }
    }
}

/// Bind the session cookie to a user id after a successful login.
pub fn log_in(session: &Session, user_id: i32) -> actix_web::Result<()> {
    session
        .insert(SESSION_USER_KEY, user_id)
        .map_err(error::ErrorInternalServerError)
}

/// Destroy the session entirely.
pub fn log_out(session: &Session) {
    session.purge();
}
