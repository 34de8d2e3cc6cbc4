use super::error::{ErrorAzCli, ResultAzCli};
use serde::de::DeserializeOwned;
use std::process::{Command, Output};
use std::{ffi::OsStr, io};

const AZ_BIN: &str = "az";

fn run<I, S>(args: I) -> ResultAzCli<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    match Command::new(AZ_BIN).args(args).output() {
        Ok(output) => Ok(output),
        Err(err) => match err.kind() {
            io::ErrorKind::NotFound => Err(ErrorAzCli::AzNotInstalled),
            _ => Err(ErrorAzCli::Io(err)),
        },
    }
}

/// Maps a failed `az` invocation onto an error, recognising the login hint
/// the CLI prints when no account is cached.
pub(super) fn classify_failure(code: Option<i32>, stderr: &str) -> ErrorAzCli {
    let stderr = stderr.trim();

    if stderr.contains("az login") {
        return ErrorAzCli::NotLoggedIn;
    }

    ErrorAzCli::CommandFailure {
        code,
        stderr: stderr.to_string(),
    }
}

fn az_raw<I, S>(args: I) -> ResultAzCli<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run(args)?;

    if output.status.success() {
        return Ok(output.stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(classify_failure(output.status.code(), &stderr))
}

pub fn az<T, I, S>(args: I) -> ResultAzCli<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let stdout = az_raw(args)?;
    Ok(serde_json::from_slice(&stdout)?)
}
