use std::fmt;

/// Bearer token for Resource Manager. Lives for one invocation.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_on: None,
        }
    }

    pub fn secret(&self) -> &str {
        &self.token
    }
}

impl From<azure_core::auth::AccessToken> for AccessToken {
    fn from(token: azure_core::auth::AccessToken) -> Self {
        Self {
            token: token.token.secret().to_string(),
            expires_on: Some(token.expires_on.to_string()),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}
