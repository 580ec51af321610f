//! Shared HTTP plumbing for the service proxies.
//!
//! # Responsibilities
//! - Hold the certificate-bearing `reqwest::Client` and the API base URL
//! - Build endpoint URLs with percent-encoded path segments
//! - Turn every HTTP exchange into an [`ApiResponse`] envelope
//!
//! # Design Decisions
//! - Non-2xx statuses are data, not errors: they land in the envelope
//! - Only transport failures and undecodable 2xx bodies become `Err`
//! - No retries; callers own retry policy

use std::path::Path;

use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::error::{ClientError, ClientResult};
use crate::config::HttpSettings;
use crate::net::tls;
use crate::observability::metrics;

/// Error detail carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetail {
    /// HTTP reason phrase for the status.
    pub reason: String,
    /// Raw response body as returned by the server.
    pub content: String,
}

/// Response envelope returned by every proxy call.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Deserialized body; `None` on failure or an empty body.
    pub content: Option<T>,
    pub status: u16,
    /// True iff `status` is in 200..=299.
    pub is_success: bool,
    pub headers: HeaderMap,
    /// Present only when `is_success` is false.
    pub error: Option<ApiErrorDetail>,
}

impl<T> ApiResponse<T> {
    /// Convert the content, keeping status, headers and error detail.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            content: self.content.map(f),
            status: self.status,
            is_success: self.is_success,
            headers: self.headers,
            error: self.error,
        }
    }

    /// Unwrap the envelope, turning a non-success status into [`ClientError::Api`].
    pub fn into_result(self) -> ClientResult<Option<T>> {
        if self.is_success {
            return Ok(self.content);
        }
        let detail = self.error.unwrap_or_else(|| ApiErrorDetail {
            reason: String::new(),
            content: String::new(),
        });
        Err(ClientError::Api {
            status: self.status,
            reason: detail.reason,
            body: detail.content,
        })
    }
}

/// Base client shared by all service proxies.
///
/// Cheap to clone; the underlying connection pool is reference-counted.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Wrap an already-configured `reqwest::Client`.
    pub fn new(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        let base_url: Url = base_url
            .parse()
            .map_err(|e| ClientError::InvalidUrl(format!("'{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "'{}' cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { http, base_url })
    }

    /// Build a client that presents the PKCS#12 certificate at `certificate_path`.
    pub fn with_certificate(
        base_url: &str,
        certificate_path: &Path,
        certificate_password: &str,
        settings: &HttpSettings,
    ) -> ClientResult<Self> {
        let identity = tls::load_identity(certificate_path, certificate_password)?;
        let http = tls::build_http_client(Some(identity), settings)?;

        tracing::info!(
            base_url = %base_url,
            certificate = %certificate_path.display(),
            "Certificate-authenticated client initialized"
        );

        Self::new(http, base_url)
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url)
    }

    pub(crate) fn put(&self, url: Url) -> RequestBuilder {
        self.http.put(url)
    }

    pub(crate) fn delete(&self, url: Url) -> RequestBuilder {
        self.http.delete(url)
    }

    /// Send a request and wrap the outcome in an [`ApiResponse`].
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_transport_error(endpoint);
                tracing::warn!(endpoint, error = %e, "Request failed before a response was received");
                return Err(e.into());
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        metrics::record_request(endpoint, status.as_u16());

        if !status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "Remote API returned non-success status");
            return Ok(ApiResponse {
                content: None,
                status: status.as_u16(),
                is_success: false,
                headers,
                error: Some(ApiErrorDetail {
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    content: body,
                }),
            });
        }

        let content = if body.trim().is_empty() {
            None
        } else {
            let value = serde_json::from_str::<T>(&body)
                .map_err(|e| ClientError::Decode(format!("{}: {}", endpoint, e)))?;
            Some(value)
        };

        Ok(ApiResponse {
            content,
            status: status.as_u16(),
            is_success: true,
            headers,
            error: None,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn test_url_building() {
        let api = client("https://config.example.com");
        let url = api.url(&["Configuration", "GetById", "5"]).unwrap();
        assert_eq!(url.as_str(), "https://config.example.com/Configuration/GetById/5");

        let api = client("https://config.example.com/api/");
        let url = api.url(&["Heartbeat", "Get"]).unwrap();
        assert_eq!(url.as_str(), "https://config.example.com/api/Heartbeat/Get");
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let api = client("https://config.example.com");
        let url = api
            .url(&["Application", "GetByName", "My App/v2"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://config.example.com/Application/GetByName/My%20App%2Fv2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new(reqwest::Client::new(), "not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));

        let err = ApiClient::new(reqwest::Client::new(), "mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_envelope_into_result() {
        let ok: ApiResponse<i32> = ApiResponse {
            content: Some(3),
            status: 200,
            is_success: true,
            headers: HeaderMap::new(),
            error: None,
        };
        assert_eq!(ok.into_result().unwrap(), Some(3));

        let failed: ApiResponse<i32> = ApiResponse {
            content: None,
            status: 409,
            is_success: false,
            headers: HeaderMap::new(),
            error: Some(ApiErrorDetail {
                reason: "Conflict".to_string(),
                content: "duplicate key".to_string(),
            }),
        };
        match failed.into_result().unwrap_err() {
            ClientError::Api { status, reason, body } => {
                assert_eq!(status, 409);
                assert_eq!(reason, "Conflict");
                assert_eq!(body, "duplicate key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
