//! Password Service
//!
//! One-way password digests using Argon2id.

use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2, Algorithm, Params, Version,
};
use tracing::debug;

use crate::shared::error::{PlatformError, Result};

/// Argon2id configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    pub parallelism: u32,
    /// Output hash length in bytes
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Low memory config for testing (faster but less secure)
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(self.memory_cost, self.time_cost, self.parallelism, Some(self.output_len))
            .map_err(|e| PlatformError::configuration(format!("Invalid Argon2 params: {}", e)))
    }
}

pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = config.to_params()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch or an unreadable digest; the caller reports
    /// both as bad credentials.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "Stored password digest is not a PHC string");
                return Ok(false);
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PlatformError::internal(format!("Password verification error: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config::testing()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let hash = service.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("correct horse", &hash).unwrap());
        assert!(!service.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let service = service();
        assert_ne!(service.hash_password("pw").unwrap(), service.hash_password("pw").unwrap());
    }

    #[test]
    fn test_unreadable_digest_is_mismatch() {
        assert!(!service().verify_password("123456", "123456").unwrap());
    }

    #[test]
    fn test_invalid_params() {
        let config = Argon2Config { memory_cost: 1, ..Argon2Config::testing() };
        assert!(matches!(PasswordService::new(config), Err(PlatformError::Configuration { .. })));
    }
}
