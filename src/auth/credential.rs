use super::error::{AuthError, AuthResult};
use super::token::AccessToken;
use super::{ARM_RESOURCE, ARM_SCOPE};
use crate::azcli;
use azure_core::auth::TokenCredential;
use azure_identity::{ClientSecretCredential, DefaultAzureCredential, TokenCredentialOptions};

/// How the invocation authenticates against Resource Manager.
#[derive(Clone)]
pub enum Credential {
    ServicePrincipal {
        tenant: String,
        client_id: String,
        secret: String,
    },
    /// Platform default chain: environment, managed identity, Azure CLI.
    Ambient { tenant: Option<String> },
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServicePrincipal {
                tenant, client_id, ..
            } => f
                .debug_struct("ServicePrincipal")
                .field("tenant", tenant)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::Ambient { tenant } => f.debug_struct("Ambient").field("tenant", tenant).finish(),
        }
    }
}

impl Credential {
    pub fn from_flags(
        service_principal: bool,
        username: Option<String>,
        password: Option<String>,
        tenant: Option<String>,
    ) -> AuthResult<Self> {
        let tenant = tenant.filter(|t| !t.trim().is_empty());

        if !service_principal {
            return Ok(Self::Ambient { tenant });
        }

        let client_id = username
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingUsername)?;
        let secret = password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::MissingSecret)?;
        let tenant = tenant.ok_or(AuthError::MissingTenant)?;

        Ok(Self::ServicePrincipal {
            tenant,
            client_id,
            secret,
        })
    }

    /// Resolves the credential into a bearer token for Resource Manager.
    /// `authority` is the identity platform host tokens are requested from.
    pub async fn token(&self, authority: &str) -> AuthResult<AccessToken> {
        let options = identity_options(authority);

        match self {
            Self::ServicePrincipal {
                tenant,
                client_id,
                secret,
            } => {
                tracing::info!(tenant, client_id, "authenticating with service principal");
                let credential = ClientSecretCredential::new(
                    options.http_client(),
                    options.authority_host()?,
                    tenant.clone(),
                    client_id.clone(),
                    secret.clone(),
                );
                fetch(&credential).await
            }
            Self::Ambient { tenant: None } => {
                tracing::info!("authenticating with default Azure credential chain");
                fetch(&DefaultAzureCredential::create(options)?).await
            }
            Self::Ambient {
                tenant: Some(tenant),
            } => tenant_token(options, tenant).await,
        }
    }
}

fn identity_options(authority: &str) -> TokenCredentialOptions {
    let mut options = TokenCredentialOptions::default();
    options.set_authority_host(authority.to_string());
    options
}

async fn fetch<C: TokenCredential>(credential: &C) -> AuthResult<AccessToken> {
    let token = credential.get_token(&[ARM_SCOPE]).await?;
    Ok(token.into())
}

/// The default chain cannot be pinned to a tenant, so a tenant given on the
/// command line goes to the Azure CLI first and the chain is the fallback.
async fn tenant_token(options: TokenCredentialOptions, tenant: &str) -> AuthResult<AccessToken> {
    let mut failures = Vec::new();

    tracing::info!(tenant, "authenticating with Azure CLI");
    match azcli::get_access_token(ARM_RESOURCE, Some(tenant)) {
        Ok(out) => {
            tracing::debug!(tenant = ?out.tenant, "token issued by Azure CLI");
            return Ok(AccessToken {
                token: out.access_token,
                expires_on: out.expires_on,
            });
        }
        Err(err) => failures.push(format!("AzureCliCredential: {err}")),
    }

    tracing::info!(tenant, "falling back to default Azure credential chain");
    let chained = match DefaultAzureCredential::create(options) {
        Ok(credential) => fetch(&credential).await,
        Err(err) => Err(err.into()),
    };
    match chained {
        Ok(token) => return Ok(token),
        Err(err) => failures.push(format!("DefaultAzureCredential: {err}")),
    }

    Err(AuthError::ChainExhausted {
        tenant: tenant.to_string(),
        failures,
    })
}
