use super::error::{ArmError, ArmResult};
use crate::auth::AccessToken;
use reqwest::{Method, RequestBuilder, Response, header};
use serde::{Serialize, de::DeserializeOwned};

/// Resource Manager client bound to one bearer token.
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    token: AccessToken,
}

/// Status and body of a call whose outcome the caller judges itself.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

impl ArmClient {
    pub fn new(http: reqwest::Client, endpoint: &str, token: AccessToken) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `{endpoint}{path}?api-version={api_version}`. `path` starts with `/`.
    pub fn url(&self, path: &str, api_version: &str) -> String {
        format!("{}{}?api-version={}", self.endpoint, path, api_version)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.token.secret())
            .header(header::ACCEPT, "application/json")
    }

    async fn execute(&self, method: Method, url: &str, builder: RequestBuilder) -> ArmResult<Response> {
        tracing::debug!(%method, url, "sending request");

        let response = builder.send().await.map_err(|source| ArmError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })?;

        tracing::debug!(%method, url, status = response.status().as_u16(), "received response");
        Ok(response)
    }

    async fn read_body(&self, method: &Method, url: &str, response: Response) -> ArmResult<String> {
        response.text().await.map_err(|source| ArmError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })
    }

    /// Sends a request and turns any non-2xx status into [`ArmError::Status`].
    pub async fn send(&self, method: Method, url: &str, body: Option<&serde_json::Value>) -> ArmResult<Response> {
        let mut builder = self.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.execute(method.clone(), url, builder).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = self.read_body(&method, url, response).await?;
        Err(ArmError::status(method.as_str(), url, status, &text))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ArmResult<T> {
        let response = self.send(Method::GET, url, None).await?;
        let text = self.read_body(&Method::GET, url, response).await?;
        decode(url, &text)
    }

    /// POSTs a JSON body and hands back whatever the server answered.
    pub async fn post_raw<B: Serialize>(&self, url: &str, body: &B) -> ArmResult<RawResponse> {
        let builder = self.request(Method::POST, url).json(body);
        let response = self.execute(Method::POST, url, builder).await?;
        let status = response.status().as_u16();
        let body = self.read_body(&Method::POST, url, response).await?;

        Ok(RawResponse { status, body })
    }

    pub async fn put<B: Serialize>(&self, url: &str, body: &B) -> ArmResult<Response> {
        let value = serde_json::to_value(body).map_err(|source| ArmError::Decode {
            url: url.to_string(),
            source,
        })?;
        self.send(Method::PUT, url, Some(&value)).await
    }

    pub(crate) async fn text(&self, url: &str, response: Response) -> ArmResult<String> {
        self.read_body(&Method::GET, url, response).await
    }
}

pub(crate) fn decode<T: DeserializeOwned>(url: &str, text: &str) -> ArmResult<T> {
    serde_json::from_str(text).map_err(|source| ArmError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> ArmClient {
        ArmClient::new(reqwest::Client::new(), &server.url(), AccessToken::new("tok"))
    }

    #[test]
    fn url_pins_api_version_and_trims_endpoint_slash() {
        let arm = ArmClient::new(
            reqwest::Client::new(),
            "https://management.azure.com/",
            AccessToken::new("tok"),
        );

        assert_eq!(
            arm.url("/providers/Microsoft.Billing/billingAccounts", "2020-05-01"),
            "https://management.azure.com/providers/Microsoft.Billing/billingAccounts?api-version=2020-05-01"
        );
    }

    #[tokio::test]
    async fn get_json_sends_bearer_and_accept_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/things")
            .match_query(Matcher::UrlEncoded("api-version".into(), "2021-10-01".into()))
            .match_header("authorization", "Bearer tok")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"name":"x"}"#)
            .create_async()
            .await;

        let arm = client(&server);
        let value: serde_json::Value = arm.get_json(&arm.url("/things", "2021-10-01")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(value["name"], "x");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/things")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"code":"NotFound","message":"gone"}}"#)
            .create_async()
            .await;

        let arm = client(&server);
        let err = arm
            .get_json::<serde_json::Value>(&arm.url("/things", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::Status { status: 404, ref code, .. } if code == "NotFound"));
    }

    #[tokio::test]
    async fn post_raw_returns_failures_unjudged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/action")
            .match_query(Matcher::Any)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"a": 1})))
            .with_status(409)
            .with_body("conflict")
            .create_async()
            .await;

        let arm = client(&server);
        let raw = arm
            .post_raw(&arm.url("/action", "1"), &serde_json::json!({"a": 1}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(raw.status, 409);
        assert_eq!(raw.body, "conflict");
        assert!(!raw.is_success());
    }
}
