use crate::application_port::{AuthError, AuthService, CredentialHasher};
use crate::domain_port::CredentialRepo;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct Argon2CredentialHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash_secret(&self, secret: &str) -> Result<String, AuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_secret(&self, secret: &str, secret_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(secret_hash)
            .map_err(|e| AuthError::InternalError(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::InternalError(format!("verify error: {e}"))),
        }
    }
}

pub struct RealAuthService {
    credential_repo: Arc<dyn CredentialRepo>,
    hasher: Arc<dyn CredentialHasher>,
}

impl RealAuthService {
    pub fn new(credential_repo: Arc<dyn CredentialRepo>, hasher: Arc<dyn CredentialHasher>) -> Self {
        RealAuthService {
            credential_repo,
            hasher,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn verify(&self, username: &str, secret: &str) -> Result<bool, AuthError> {
        let Some(record) = self.credential_repo.get_by_username(username).await? else {
            return Ok(false);
        };

        self.hasher.verify_secret(secret, &record.secret_hash).await
    }
}
