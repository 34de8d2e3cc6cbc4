use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("--username (client id) is required with --service-principal")]
    MissingUsername,
    #[error("--password (client secret) is required with --service-principal")]
    MissingSecret,
    #[error("--tenant is required with --service-principal")]
    MissingTenant,
    #[error("Failed to acquire a Resource Manager token: {0}")]
    Identity(#[from] azure_core::Error),
    #[error("Failed to read client secret: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("No credential for tenant '{tenant}' succeeded:\n{}", .failures.join("\n"))]
    ChainExhausted {
        tenant: String,
        failures: Vec<String>,
    },
}
