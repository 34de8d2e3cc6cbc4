mod credential;
mod error;
mod token;

pub use credential::Credential;
pub use error::AuthError;
pub use token::AccessToken;

/// Scope requested from the identity platform for Resource Manager calls.
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";
/// Resource name the Azure CLI expects for the same audience.
pub const ARM_RESOURCE: &str = "https://management.azure.com/";
