#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_secret(&self, secret: &str) -> Result<String, AuthError>;
    async fn verify_secret(&self, secret: &str, secret_hash: &str) -> Result<bool, AuthError>;
}

/// Session gate for the desktop shell. A bad username and a bad secret are
/// indistinguishable to the caller; there is no lockout or rate limiting.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn verify(&self, username: &str, secret: &str) -> Result<bool, AuthError>;
}
