//! Password hashing (Argon2id, PHC strings).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::HasherConfig;
use crate::error::{AppError, AppResult};
use crate::models::PasswordSecret;

#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
    /// Hash of a random throwaway password, verified against when a login names an unknown
    /// user so both rejections cost one Argon2 run.
    decoy: PasswordSecret,
}

impl CredentialHasher {
    pub fn new(config: &HasherConfig) -> AppResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::Hashing(format!("params: {}", e)))?;
        let mut hasher = Self {
            params,
            decoy: PasswordSecret::from_phc(String::new()),
        };
        let throwaway = SaltString::generate(&mut OsRng);
        hasher.decoy = hasher.hash(throwaway.as_str())?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> AppResult<PasswordSecret> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::Hashing(e.to_string()))?
            .to_string();
        Ok(PasswordSecret::from_phc(hash))
    }

    /// Check `plaintext` against a stored secret. Cost parameters and salt come from the
    /// secret itself, so hashes made under older settings still verify. Malformed secrets
    /// simply do not match.
    pub fn verify(&self, plaintext: &str, secret: &PasswordSecret) -> bool {
        match PasswordHash::new(secret.as_str()) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// `hash` on the blocking pool. Takes the plaintext by value; it is dropped as soon as
    /// hashing finishes.
    pub async fn hash_blocking(&self, plaintext: String) -> AppResult<PasswordSecret> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AppError::Hashing(format!("hash task: {}", e)))?
    }

    /// `verify` on the blocking pool.
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        secret: PasswordSecret,
    ) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &secret))
            .await
            .map_err(|e| AppError::Hashing(format!("verify task: {}", e)))
    }

    /// Spend one verification on the decoy secret. Always a mismatch.
    pub async fn verify_decoy_blocking(&self, plaintext: String) -> AppResult<()> {
        self.verify_blocking(plaintext, self.decoy.clone()).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> CredentialHasher {
    CredentialHasher::new(&HasherConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}
