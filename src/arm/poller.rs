use super::client::{ArmClient, decode};
use super::error::{ArmError, ArmResult, ErrorDetail};
use reqwest::{Method, Response, StatusCode, header::HeaderMap};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};

const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
const LOCATION: &str = "location";
const RETRY_AFTER: &str = "retry-after";

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Delay between polls when the server sends no `Retry-After`.
    pub interval: Duration,
    /// Upper bound on the whole operation.
    pub timeout: Duration,
}

#[derive(Debug)]
enum Monitor {
    AsyncOperation(String),
    Location(String),
    Resource,
}

#[derive(Debug, PartialEq, Eq)]
enum State {
    Running(String),
    Succeeded,
    Failed(String),
}

impl State {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "failed" | "canceled" | "cancelled" => Self::Failed(raw.to_string()),
            _ => Self::Running(raw.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct OperationStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn retry_after(headers: &HeaderMap, fallback: Duration) -> Duration {
    header(headers, RETRY_AFTER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn provisioning_state(body: &Value) -> Option<&str> {
    body.pointer("/properties/provisioningState")
        .or_else(|| body.get("provisioningState"))
        .and_then(Value::as_str)
}

fn failure_message(body: &Value) -> String {
    body.pointer("/error/message")
        .or_else(|| body.pointer("/properties/error/message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Drives a long-running PUT on `resource_url` to a terminal state and
/// returns the final resource.
///
/// `on_state` is called with every intermediate state the server reports.
pub async fn poll_put<T, F>(
    client: &ArmClient,
    resource_url: &str,
    initial: Response,
    options: PollOptions,
    mut on_state: F,
) -> ArmResult<T>
where
    T: DeserializeOwned,
    F: FnMut(&str),
{
    // `None` when the timeout reaches past what `Instant` can represent.
    let deadline = Instant::now().checked_add(options.timeout);
    let status = initial.status();
    let headers = initial.headers().clone();
    let body = client.text(resource_url, initial).await?;

    let monitor = if let Some(url) = header(&headers, AZURE_ASYNC_OPERATION) {
        Monitor::AsyncOperation(url.to_string())
    } else if let Some(url) = header(&headers, LOCATION) {
        Monitor::Location(url.to_string())
    } else {
        Monitor::Resource
    };
    tracing::info!(?monitor, status = status.as_u16(), "polling long-running operation");

    let mut delay = retry_after(&headers, options.interval);

    if let Monitor::Resource = monitor {
        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            decode(resource_url, &body)?
        };

        match provisioning_state(&value).map(State::parse) {
            None | Some(State::Succeeded) if !value.is_null() => {
                return decode(resource_url, &body);
            }
            Some(State::Failed(state)) => {
                return Err(ArmError::OperationFailed {
                    resource: resource_url.to_string(),
                    state,
                    message: failure_message(&value),
                });
            }
            Some(State::Running(state)) => on_state(&state),
            _ => {}
        }
    }

    loop {
        let remaining = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
        if remaining.is_some_and(|remaining| delay > remaining) {
            return Err(ArmError::PollTimeout {
                resource: resource_url.to_string(),
                waited: options.timeout,
            });
        }
        sleep(delay).await;

        match &monitor {
            Monitor::AsyncOperation(url) => {
                let response = client.send(Method::GET, url, None).await?;
                delay = retry_after(response.headers(), options.interval);
                let text = client.text(url, response).await?;
                let op: OperationStatus = decode(url, &text)?;

                match State::parse(&op.status) {
                    State::Succeeded => return client.get_json(resource_url).await,
                    State::Failed(state) => {
                        return Err(ArmError::OperationFailed {
                            resource: resource_url.to_string(),
                            state,
                            message: op.error.map(|e| e.message).unwrap_or_default(),
                        });
                    }
                    State::Running(state) => on_state(&state),
                }
            }
            Monitor::Location(url) => {
                let response = client.send(Method::GET, url, None).await?;
                if response.status() == StatusCode::ACCEPTED {
                    delay = retry_after(response.headers(), options.interval);
                    on_state("Accepted");
                    continue;
                }
                return client.get_json(resource_url).await;
            }
            Monitor::Resource => {
                let response = client.send(Method::GET, resource_url, None).await?;
                delay = retry_after(response.headers(), options.interval);
                let text = client.text(resource_url, response).await?;
                let value: Value = decode(resource_url, &text)?;

                match provisioning_state(&value).map(State::parse) {
                    None | Some(State::Succeeded) => return decode(resource_url, &text),
                    Some(State::Failed(state)) => {
                        return Err(ArmError::OperationFailed {
                            resource: resource_url.to_string(),
                            state,
                            message: failure_message(&value),
                        });
                    }
                    Some(State::Running(state)) => on_state(&state),
                }
            }
        }
    }
}
