//! HTTP client for the snake catalog API.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snakedex_types::{SnakeList, SnakeRecord};
use url::Url;

use crate::config::Config;

/// Error category for API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: the session is missing, invalid or expired
    Unauthorized,
    /// Any other non-success status (4xx, 5xx)
    HttpStatus,
    /// Request or connect timeout
    Timeout,
    /// Connection refused, DNS, TLS and other transport failures
    Network,
    /// Response body did not have the expected shape
    Parse,
    /// Rejected locally before any request was sent
    Validation,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Validation => write!(f, "validation"),
        }
    }
}

/// Structured error from the catalog API with kind and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Raw response body or other extra context
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Builds an error from a non-success response.
    ///
    /// 401 becomes [`ApiErrorKind::Unauthorized`]; 403 stays a plain status
    /// error so a refused call keeps the session. A `detail`,
    /// `message` or `error` string in a JSON body is lifted into the message.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::HttpStatus
        };

        let reason = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        });

        Self {
            kind,
            status: Some(status),
            message: match reason {
                Some(reason) => format!("HTTP {status}: {reason}"),
                None => format!("HTTP {status}"),
            },
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub fn classify_reqwest_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::new(ApiErrorKind::Timeout, format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::new(ApiErrorKind::Network, format!("Connection failed: {e}"))
    } else if e.is_decode() {
        ApiError::new(ApiErrorKind::Parse, format!("Invalid response body: {e}"))
    } else if e.is_request() {
        ApiError::new(ApiErrorKind::Network, format!("Request error: {e}"))
    } else {
        ApiError::new(ApiErrorKind::Network, format!("Network error: {e}"))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

/// Client for the catalog REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: Url,
    create_path: String,
    http: reqwest::Client,
}

impl CatalogClient {
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `SNAKEDEX_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// Point `SNAKEDEX_API_URL` at a mock server instead.
    pub fn new(base_url: Url, create_path: &str, timeout: Option<Duration>) -> Result<Self> {
        let is_production =
            base_url.as_str().trim_end_matches('/') == Config::DEFAULT_API_BASE_URL;

        #[cfg(test)]
        if is_production {
            panic!(
                "Tests must not use the production catalog API!\n\
                 Point the client at a mock server (e.g., wiremock).\n\
                 Found base_url: {base_url}"
            );
        }

        #[cfg(not(test))]
        if std::env::var("SNAKEDEX_BLOCK_REAL_API").is_ok_and(|v| v == "1") && is_production {
            panic!(
                "SNAKEDEX_BLOCK_REAL_API=1 but trying to use the production catalog API!\n\
                 Set SNAKEDEX_API_URL to a mock server.\n\
                 Found base_url: {base_url}"
            );
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            create_path: create_path.to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.effective_api_base_url()?,
            &config.effective_create_path(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /login`. Returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let url = self.endpoint(&["login"])?;
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let body: LoginResponse = Self::read_json("POST /login", response).await?;

        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::new(ApiErrorKind::Parse, "Login response has no access_token"))
    }

    /// `POST /forgot-password`.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        let url = self.endpoint(&["forgot-password"])?;
        let response = self
            .http
            .post(url)
            .json(&ForgotPasswordRequest { email })
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::expect_success("POST /forgot-password", response).await
    }

    /// `POST /reset-password`.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<()> {
        let url = self.endpoint(&["reset-password"])?;
        let response = self
            .http
            .post(url)
            .json(&ResetPasswordRequest {
                token,
                new_password,
            })
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::expect_success("POST /reset-password", response).await
    }

    /// `GET /snakes`.
    pub async fn list_snakes(&self, token: &str) -> ApiResult<Vec<SnakeRecord>> {
        let url = self.endpoint(&["snakes"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let list: SnakeList = Self::read_json("GET /snakes", response).await?;
        tracing::debug!(count = list.snakes.len(), "catalog fetched");
        Ok(list.snakes)
    }

    /// Creates a record at the configured create path.
    pub async fn create_snake(&self, token: &str, record: &SnakeRecord) -> ApiResult<()> {
        check_required(record)?;
        let segments: Vec<&str> = self
            .create_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let url = self.endpoint(&segments)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(record)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::expect_success("POST create", response).await
    }

    /// `PUT /snakes/binomial/:binomial`, addressed by the record's original binomial.
    pub async fn update_snake(
        &self,
        token: &str,
        original_binomial: &str,
        record: &SnakeRecord,
    ) -> ApiResult<()> {
        check_required(record)?;
        let url = self.binomial_endpoint(original_binomial)?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(record)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::expect_success("PUT /snakes/binomial", response).await
    }

    /// `DELETE /snakes/binomial/:binomial`.
    pub async fn delete_snake(&self, token: &str, binomial: &str) -> ApiResult<()> {
        let url = self.binomial_endpoint(binomial)?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::expect_success("DELETE /snakes/binomial", response).await
    }

    fn binomial_endpoint(&self, binomial: &str) -> ApiResult<Url> {
        if binomial.trim().is_empty() {
            return Err(ApiError::validation("Binomial name is required"));
        }
        self.endpoint(&["snakes", "binomial", binomial])
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::validation(format!("Base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn expect_success(label: &str, response: reqwest::Response) -> ApiResult<()> {
        let status = response.status();
        tracing::info!(call = label, status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::http_status(status.as_u16(), &body))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        label: &str,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        tracing::info!(call = label, status = status.as_u16(), "api response");
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError {
            kind: ApiErrorKind::Parse,
            status: Some(status.as_u16()),
            message: format!("Failed to parse {label} response: {e}"),
            details: Some(body),
        })
    }
}

fn check_required(record: &SnakeRecord) -> ApiResult<()> {
    let missing = record.missing_required();
    if missing.is_empty() {
        return Ok(());
    }
    let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
    Err(ApiError::validation(format!(
        "Missing required fields: {}",
        labels.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> CatalogClient {
        let base = Url::parse(&server.uri()).unwrap();
        CatalogClient::new(base, "/addsnake", Some(Duration::from_secs(5))).unwrap()
    }

    fn cobra() -> SnakeRecord {
        SnakeRecord {
            thai_name: "งูเห่า".into(),
            binomial: "Naja naja".into(),
            ..SnakeRecord::default()
        }
    }

    #[test]
    fn http_status_maps_auth_failures_to_unauthorized() {
        assert_eq!(ApiError::http_status(401, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::http_status(403, "").kind, ApiErrorKind::HttpStatus);
        assert_eq!(ApiError::http_status(500, "").kind, ApiErrorKind::HttpStatus);
    }

    #[test]
    fn http_status_extracts_detail_message() {
        let err = ApiError::http_status(404, r#"{"detail": "Snake not found"}"#);
        assert_eq!(err.message, "HTTP 404: Snake not found");
        assert_eq!(err.status, Some(404));
        assert!(err.details.is_some());

        let err = ApiError::http_status(502, "bad gateway");
        assert_eq!(err.message, "HTTP 502");
    }

    #[tokio::test]
    async fn login_returns_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"email": "a@x.com", "password": "p"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T"})))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server).login("a@x.com", "p").await.unwrap();
        assert_eq!(token, "T");
    }

    #[tokio::test]
    async fn login_without_token_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).login("a@x.com", "p").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[tokio::test]
    async fn list_sends_bearer_and_normalizes_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snakes"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "snakes": [{"thai_name": "งูเห่า", "binomial": "Naja naja", "habitat": "ป่า, นา"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snakes = client_for(&server).list_snakes("T").await.unwrap();
        assert_eq!(snakes.len(), 1);
        assert_eq!(snakes[0].habitat.entries(), ["ป่า", "นา"]);
        assert_eq!(snakes[0].diet.entries(), [""]);
    }

    #[tokio::test]
    async fn list_maps_401_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snakes"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).list_snakes("stale").await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn delete_encodes_binomial_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/snakes/binomial/Naja%20naja"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_snake("T", "Naja naja").await.unwrap();
    }

    #[tokio::test]
    async fn update_addresses_original_binomial() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/snakes/binomial/Naja%20naja"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut record = cobra();
        record.binomial = "Naja kaouthia".into();
        client_for(&server)
            .update_snake("T", "Naja naja", &record)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_posts_full_record_to_create_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/addsnake"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).create_snake("T", &cobra()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["binomial"], json!("Naja naja"));
        assert_eq!(body["is_venomous"], json!(0));
        assert_eq!(body["first_aid"], json!([""]));
    }

    #[tokio::test]
    async fn create_with_missing_names_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_snake("T", &SnakeRecord::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
    }

    #[tokio::test]
    async fn reset_password_sends_token_and_new_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reset-password"))
            .and(body_json(json!({"token": "R", "new_password": "n3w"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "expired"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .reset_password("R", "n3w")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.message, "HTTP 400: expired");
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = CatalogClient::new(base, "/addsnake", Some(Duration::from_secs(2))).unwrap();

        let err = client.forgot_password("a@x.com").await.unwrap_err();
        assert!(matches!(
            err.kind,
            ApiErrorKind::Network | ApiErrorKind::Timeout
        ));
    }
}
