//! Implements the `Remote` trait against the tracker REST backend using `reqwest`.

use crate::api::Remote;
use crate::error::RemoteError;
use crate::model::YearRecord;
use crate::Result;
use anyhow::Context;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

const TRACKER_PATH: &str = "api/tracker";
const LOGIN_PATH: &str = "api/auth/login";
const REGISTER_PATH: &str = "api/auth/register";

pub(super) struct HttpRemote {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpRemote {
    pub(super) fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base: base_url(api_url)?,
            token,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Unable to build a URL for '{path}' from {}", self.base))
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn authenticate(&self, path: &str, username: &str, password: &str) -> Result<String> {
        let url = self.url(path)?;
        debug!("POST {url} for user {username}");
        let request = self.client.post(url).json(&Credentials { username, password });
        let response: TokenResponse = read_json(send(request).await?).await?;
        Ok(response.token)
    }
}

#[async_trait::async_trait]
impl Remote for HttpRemote {
    async fn fetch(&self, year: i32) -> Result<YearRecord> {
        let url = self.url(&format!("{TRACKER_PATH}/{year}"))?;
        debug!("GET {url}");
        let response = send(self.with_token(self.client.get(url))).await?;
        read_json(response).await
    }

    async fn create(&self, record: &YearRecord) -> Result<YearRecord> {
        let url = self.url(TRACKER_PATH)?;
        debug!("POST {url} for year {}", record.year());
        let response = send(self.with_token(self.client.post(url).json(record))).await?;
        read_json(response).await
    }

    async fn update(&self, record: &YearRecord) -> Result<YearRecord> {
        let url = self.url(&format!("{TRACKER_PATH}/{}", record.year()))?;
        debug!("PUT {url}");
        let response = send(self.with_token(self.client.put(url).json(record))).await?;
        read_json(response).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<String> {
        self.authenticate(LOGIN_PATH, username, password).await
    }

    async fn register(&self, username: &str, password: &str) -> Result<String> {
        self.authenticate(REGISTER_PATH, username, password).await
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// The backend reports failures as `{ "message": "..." }`.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Sends the request and turns transport failures and non-success statuses into `RemoteError`.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| RemoteError::Network(e.to_string()))?;
    let status = response.status();
    trace!("Response status {status}");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(status.as_u16(), error_message(&body)).into())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| RemoteError::Network(e.to_string()))?;
    serde_json::from_str(&body).context("Unable to parse the response from the tracker backend")
}

fn classify(status: u16, message: String) -> RemoteError {
    match status {
        401 | 403 => RemoteError::Auth { status, message },
        404 => RemoteError::NotFound(message),
        409 => RemoteError::Conflict(message),
        _ => RemoteError::Status { status, message },
    }
}

fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::from("(no message)")
    } else {
        trimmed.to_string()
    }
}

/// Parses the configured API URL and makes sure relative paths join underneath it.
fn base_url(api_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(api_url).with_context(|| format!("Invalid tracker API URL '{api_url}'"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_classify() {
        assert_eq!(classify(404, "x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(classify(409, "x".into()).kind(), ErrorKind::Conflict);
        assert_eq!(classify(401, "x".into()).kind(), ErrorKind::AuthFailure);
        assert_eq!(classify(403, "x".into()).kind(), ErrorKind::AuthFailure);
        assert_eq!(classify(500, "x".into()).kind(), ErrorKind::NetworkFailure);
        assert_eq!(
            classify(409, "Tracker for this year already exists".into()),
            RemoteError::Conflict("Tracker for this year already exists".into())
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"message":"Tracker not found"}"#),
            "Tracker not found"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "(no message)");
    }

    #[test]
    fn test_base_url_paths() {
        let remote = HttpRemote::new("http://localhost:5000", None).unwrap();
        assert_eq!(
            remote.url("api/tracker/2025").unwrap().as_str(),
            "http://localhost:5000/api/tracker/2025"
        );

        let remote = HttpRemote::new("https://example.com/finance", None).unwrap();
        assert_eq!(
            remote.url(TRACKER_PATH).unwrap().as_str(),
            "https://example.com/finance/api/tracker"
        );

        assert!(HttpRemote::new("not a url", None).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_failure() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let remote = HttpRemote::new("http://127.0.0.1:9", None).unwrap();
        let err = remote.fetch(2025).await.unwrap_err();
        assert_eq!(
            crate::error::remote_error_kind(&err),
            Some(ErrorKind::NetworkFailure)
        );
    }
}
