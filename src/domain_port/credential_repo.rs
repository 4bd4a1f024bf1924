use crate::application_port::AuthError;

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub username: String,
    pub secret_hash: String,
}

#[async_trait::async_trait]
pub trait CredentialRepo: Send + Sync {
    async fn count(&self) -> Result<i64, AuthError>;

    async fn insert(&self, username: &str, secret_hash: &str) -> Result<(), AuthError>;

    async fn get_by_username(&self, username: &str)
    -> Result<Option<CredentialRecord>, AuthError>;
}
