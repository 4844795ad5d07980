//! Utilities for cryptographic operations.

use argon2::{
    password_hash::{Salt, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::RngCore;
use ring::digest::{digest, Digest, SHA256};

/// Hashes the input using SHA-256.
///
/// Only use this for long random secrets like session tokens. Passwords go through
/// [`hash_with_salt`].
pub(crate) fn hash_without_salt<T: AsRef<[u8]>>(bytes: &T) -> Digest {
    digest(&SHA256, bytes.as_ref())
}

/// Salts and hashes the input using Argon2, returning a hash in PHC string format.
///
/// A salted hash can't be looked up by value, so rows are found by another column first and then
/// checked with [`verify_hash`].
pub(crate) fn hash_with_salt<T: AsRef<[u8]>>(bytes: &T) -> String {
    let mut salt = [0; Salt::RECOMMENDED_LENGTH];
    rand::rng().fill_bytes(&mut salt);

    let salt_string = SaltString::encode_b64(&salt).expect("salt should be valid");

    Argon2::default()
        .hash_password(bytes.as_ref(), &salt_string)
        .expect("password hashing should be infallible")
        .to_string()
}

/// Checks if the input bytes match an Argon2 hash in PHC string format (as outputted by
/// [`hash_with_salt`]).
///
/// If the hash string is invalid, returns `false`.
pub(crate) fn verify_hash<T: AsRef<[u8]>>(bytes: &T, hash_phc_format: &str) -> bool {
    let Ok(hash) = PasswordHash::new(hash_phc_format) else {
        return false;
    };

    Argon2::default()
        .verify_password(bytes.as_ref(), &hash)
        .is_ok()
}
