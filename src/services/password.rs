//! Argon2id password hashing and the credential policy applied on account creation.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::{PasswordPolicy, SecurityConfig};

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. Parameters are read from the hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {e}")),
    }
}

impl PasswordPolicy {
    /// Returns every rule the password violates; empty means accepted.
    #[must_use]
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(format!(
                "Passwords must be at least {} characters.",
                self.min_length
            ));
        }
        if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            errors.push("Passwords must have at least one non alphanumeric character.".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            errors.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            errors.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 64,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("p@55wOrd", &cheap_params()).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("p@55wOrd", &hash).unwrap());
        assert!(!verify_password("p@55word", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("p@55wOrd", "not-a-hash").is_err());
    }

    #[test]
    fn test_seed_password_satisfies_default_policy() {
        let policy = PasswordPolicy::default();
        assert!(policy.violations("p@55wOrd").is_empty());
    }

    #[test]
    fn test_policy_collects_all_violations() {
        let policy = PasswordPolicy::default();
        let errors = policy.violations("abc");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("at least 6 characters"));
        assert!(errors.iter().any(|e| e.contains("digit")));
        assert!(errors.iter().any(|e| e.contains("uppercase")));
        assert!(errors.iter().any(|e| e.contains("non alphanumeric")));
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 1,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
        };
        assert!(policy.violations("x").is_empty());
    }
}
