//! HTTP transport shared by the storefront and admin clients.
//!
//! # Authentication
//!
//! Once a bearer token is set (see the admin crate's login), it is attached
//! to every request except the public endpoints. When the backend answers
//! 401 the client calls `POST /auth/refresh-token` once, stores the new
//! token and replays the original request a single time. A failed refresh
//! surfaces the original 401.
//!
//! # Errors
//!
//! All failures become [`ApiError`]; see [`crate::error`].

mod upload;

pub use upload::{Upload, UploadError};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result};

/// Endpoints that never carry the bearer token.
const PUBLIC_ENDPOINTS: &[&str] = &["login", "user/createSuperAdmin"];

/// Endpoint that exchanges the session cookie for a fresh access token.
const REFRESH_ENDPOINT: &[&str] = &["auth", "refresh-token"];

/// Response from the refresh endpoint.
#[derive(serde::Deserialize)]
struct RefreshResponse {
    token: String,
}

/// Client for the shop's REST backend.
///
/// Cheap to clone; clones share the connection pool, cookie jar and token.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl BackendClient {
    /// Create a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                warn!(error = %e, "failed to build HTTP client");
                ApiError::without_response("Failed to initialise HTTP client")
            })?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url,
                token: RwLock::new(None),
            }),
        })
    }

    /// Create a client from storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    /// The API root every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Attach `token` to subsequent authenticated requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Forget the current token.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// The token currently attached to requests, if any.
    pub async fn token(&self) -> Option<SecretString> {
        self.inner.token.read().await.clone()
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` carrying the backend message or `fallback`.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str], fallback: &str) -> Result<T> {
        let (status, body) = self.execute(Method::GET, segments, fallback, Ok).await?;
        decode(status, &body, fallback)
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` carrying the backend message or `fallback`.
    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = self
            .execute(Method::POST, segments, fallback, |r| Ok(r.json(body)))
            .await?;
        decode(status, &text, fallback)
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` carrying the backend message or `fallback`.
    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = self
            .execute(Method::PUT, segments, fallback, |r| Ok(r.json(body)))
            .await?;
        decode(status, &text, fallback)
    }

    /// `DELETE` a resource, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` carrying the backend message or `fallback`.
    pub async fn delete(&self, segments: &[&str], fallback: &str) -> Result<()> {
        self.execute(Method::DELETE, segments, fallback, Ok)
            .await
            .map(|_| ())
    }

    /// `POST` files as `multipart/form-data`, each under the form field `field`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` carrying the backend message or `fallback`.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        field: &'static str,
        files: &[Upload],
        fallback: &str,
    ) -> Result<T> {
        let (status, text) = self
            .execute(Method::POST, segments, fallback, |r| {
                let mut form = reqwest::multipart::Form::new();
                for file in files {
                    let part = file.to_part().map_err(|e| {
                        warn!(error = %e, file = %file.file_name(), "invalid upload part");
                        ApiError::without_response(fallback)
                    })?;
                    form = form.part(field, part);
                }
                Ok(r.multipart(form))
            })
            .await?;
        decode(status, &text, fallback)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Send a request, refreshing the token and replaying once on 401.
    ///
    /// `attach` adds the body; it is called again for the replay, so it must
    /// rebuild the body from borrowed data each time.
    #[instrument(skip(self, fallback, attach), fields(path = %segments.join("/")))]
    async fn execute<F>(
        &self,
        method: Method,
        segments: &[&str],
        fallback: &str,
        attach: F,
    ) -> Result<(StatusCode, String)>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder> + Send + Sync,
    {
        let url = self.endpoint(segments, fallback)?;
        let authenticated = requires_auth(segments);

        let response = self
            .send_once(method.clone(), &url, authenticated, &attach, fallback)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && authenticated
            && segments != REFRESH_ENDPOINT
        {
            debug!("access token rejected, attempting refresh");
            match self.refresh_token().await {
                Ok(()) => {
                    let retry = self
                        .send_once(method, &url, authenticated, &attach, fallback)
                        .await?;
                    return read_body(retry, fallback).await;
                }
                Err(e) => warn!(error = %e, "token refresh failed"),
            }
        }

        read_body(response, fallback).await
    }

    async fn send_once<F>(
        &self,
        method: Method,
        url: &Url,
        authenticated: bool,
        attach: &F,
        fallback: &str,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder> + Send + Sync,
    {
        let mut request = self.inner.client.request(method, url.clone());
        if authenticated && let Some(token) = self.token().await {
            request = request.bearer_auth(token.expose_secret());
        }

        attach(request)?.send().await.map_err(|e| {
            warn!(error = %e, url = %url, "backend unreachable");
            ApiError::without_response(fallback)
        })
    }

    /// Exchange the session for a new access token.
    async fn refresh_token(&self) -> Result<()> {
        const FALLBACK: &str = "Failed to refresh session";

        let url = self.endpoint(REFRESH_ENDPOINT, FALLBACK)?;
        let no_body = |r: RequestBuilder| -> Result<RequestBuilder> { Ok(r) };
        let response = self
            .send_once(Method::POST, &url, true, &no_body, FALLBACK)
            .await?;
        let (status, body) = read_body(response, FALLBACK).await?;
        let refreshed: RefreshResponse = decode(status, &body, FALLBACK)?;

        self.set_token(SecretString::from(refreshed.token)).await;
        debug!("access token refreshed");
        Ok(())
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str], fallback: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::without_response(fallback))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn requires_auth(segments: &[&str]) -> bool {
    let path = segments.join("/");
    !PUBLIC_ENDPOINTS.contains(&path.as_str())
}

/// Read the body, turning non-success statuses into `ApiError`.
async fn read_body(response: Response, fallback: &str) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        warn!(error = %e, status = %status, "failed to read response body");
        ApiError::without_response(fallback)
    })?;

    if status.is_success() {
        Ok((status, body))
    } else {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "backend returned non-success status"
        );
        Err(ApiError::from_response(status, &body, fallback))
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str, fallback: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "failed to parse backend response"
        );
        ApiError::from_response(status, "", fallback)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://localhost:8082/api/v1/");
        let url = client.endpoint(&["products", "66a1"], "x").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8082/api/v1/products/66a1");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = client("http://localhost:8082/api/v1/");
        let url = client.endpoint(&["products", "a/b c"], "x").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8082/api/v1/products/a%2Fb%20c");
    }

    #[test]
    fn test_public_endpoints() {
        assert!(!requires_auth(&["login"]));
        assert!(!requires_auth(&["user", "createSuperAdmin"]));
        assert!(requires_auth(&["products"]));
        assert!(requires_auth(REFRESH_ENDPOINT));
    }

    #[test]
    fn test_decode_failure_uses_fallback() {
        let err = decode::<serde_json::Value>(StatusCode::OK, "not json", "Failed to fetch products")
            .unwrap_err();
        assert_eq!(err.message(), "Failed to fetch products");
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let client = client("http://localhost:8082/api/v1/");
        assert!(client.token().await.is_none());

        client.set_token(SecretString::from("abc")).await;
        assert_eq!(client.token().await.unwrap().expose_secret(), "abc");

        client.clear_token().await;
        assert!(client.token().await.is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", client("http://localhost:8082/api/v1/"));
        assert!(debug.contains("localhost:8082"));
        assert!(!debug.contains("token"));
    }
}
