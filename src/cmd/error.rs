use crate::arm::ArmError;
use crate::auth::AuthError;
use crate::config::ConfigError;
use std::io;
use thiserror::Error;

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Arm(#[from] ArmError),
    /// The response body has already been written to stdout.
    #[error("Failed to {action} {target} code {status}")]
    RequestFailed {
        action: &'static str,
        target: String,
        status: u16,
    },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to encode YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failure_names_target_and_status() {
        let err = CommandError::RequestFailed {
            action: "accept ownership of subscription",
            target: "0000-1111".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to accept ownership of subscription 0000-1111 code 404"
        );
    }
}
