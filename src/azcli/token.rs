use super::error::{ErrorAzCli, ResultAzCli};
use super::run::az;
use serde::Deserialize;

/// Output of `az account get-access-token -o json`.
#[derive(Debug, Deserialize)]
pub struct AzAccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "expiresOn", default)]
    pub expires_on: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
}

fn token_args<'a>(resource: &'a str, tenant: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec![
        "account",
        "get-access-token",
        "--resource",
        resource,
        "-o",
        "json",
    ];

    if let Some(tenant) = tenant {
        args.extend(["--tenant", tenant]);
    }

    args
}

pub fn get_access_token(resource: &str, tenant: Option<&str>) -> ResultAzCli<AzAccessToken> {
    let token: AzAccessToken = az(token_args(resource, tenant))?;

    if token.access_token.trim().is_empty() {
        return Err(ErrorAzCli::EmptyToken {
            resource: resource.to_string(),
        });
    }

    Ok(token)
}
