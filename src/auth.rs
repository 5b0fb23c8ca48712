//! Password digests for the built-in credential store.
//!
//! Stored form is `<salt>$<argon2id(password, salt)>`, both parts standard
//! base64.

use argon2::Argon2;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

pub fn hash_password(password: &str) -> Result<String, argon2::Error> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = derive(password, &salt)?;
    Ok(format!("{}${}", STANDARD.encode(salt), STANDARD.encode(digest)))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt), STANDARD.decode(expected)) else {
        return false;
    };

    match derive(password, &salt) {
        Ok(actual) => constant_time_eq::constant_time_eq(&actual, &expected),
        Err(e) => {
            tracing::warn!("Stored password digest is unusable: {}", e);
            false
        }
    }
}

fn derive(password: &str, salt: &[u8]) -> Result<[u8; DIGEST_LEN], argon2::Error> {
    let mut digest = [0u8; DIGEST_LEN];
    Argon2::default().hash_password_into(password.as_bytes(), salt, &mut digest)?;
    Ok(digest)
}
