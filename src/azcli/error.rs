use std::io;
use thiserror::Error;

pub type ResultAzCli<T> = Result<T, ErrorAzCli>;

#[derive(Debug, Error)]
pub enum ErrorAzCli {
    #[error("Azure CLI (az) not found on PATH. Install it or use --service-principal.")]
    AzNotInstalled,
    #[error("Azure CLI has no cached account. Run `az login` first.")]
    NotLoggedIn,
    #[error("Azure CLI exited with code {code:?}: {stderr}")]
    CommandFailure { code: Option<i32>, stderr: String },
    #[error("Azure CLI returned an empty access token for {resource}")]
    EmptyToken { resource: String },
    #[error("Unexpected Azure CLI output: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Failed to start Azure CLI: {0}")]
    Io(#[from] io::Error),
}
