//! Request executor: builds, authenticates, dispatches, and classifies a
//! single API call.
//!
//! Every feature module funnels through [`Client::api_post`]. The executor
//! owns endpoint selection (dual-stack vs IPv4-only), credential injection
//! and scrubbing, the cooperative rate-limit delay, transport-level retries,
//! and outcome classification into the library error taxonomy.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::dns::Dns;
use crate::error::{PorkbunError, Result};
use crate::logging::{redact_payload, truncate_for_log};
use crate::pricing::Pricing;
use crate::ssl::Ssl;

/// Dual-stack API endpoint.
pub(crate) const API_BASE: &str = "https://api.porkbun.com/api/json/v3";
/// IPv4-only API endpoint.
pub(crate) const API_BASE_V4: &str = "https://api-ipv4.porkbun.com/api/json/v3";

/// JSON body field carrying the API key on authenticated calls.
pub(crate) const AUTH_KEY_FIELD: &str = "apikey";
/// JSON body field carrying the API secret key on authenticated calls.
pub(crate) const AUTH_SECRET_FIELD: &str = "secretapikey";

/// HTTP statuses the upstream uses for success.
const ACCEPTED_STATUS: &[u16] = &[200];

/// A decoded JSON object payload.
pub type JsonObject = Map<String, Value>;

/// Per-call options for [`Client::api_post`].
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Inject the credential pair into the request body. Defaults to `true`.
    pub auth: bool,
    /// Use the IPv4-only endpoint for this call even when the client default
    /// is dual-stack.
    pub force_v4: bool,
    /// Override the configured transport retry count for this call.
    pub retries: Option<u32>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            auth: true,
            force_v4: false,
            retries: None,
        }
    }
}

impl CallOptions {
    /// Options for an endpoint that takes no credentials.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            auth: false,
            ..Self::default()
        }
    }

    /// Pin this call to the IPv4-only endpoint.
    #[must_use]
    pub fn force_v4(mut self, force: bool) -> Self {
        self.force_v4 = force;
        self
    }

    /// Override the transport retry count for this call.
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// Porkbun API client.
///
/// Holds the immutable [`ClientConfig`] and one HTTP client; both are safe
/// for concurrent read-only use, so a `Client` can be shared across tasks.
/// Feature modules borrow it via [`dns()`](Self::dns), [`ssl()`](Self::ssl)
/// and [`pricing()`](Self::pricing).
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    base_url_v4: String,
}

impl Client {
    /// Create a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PorkbunError::Configuration`] when the HTTP transport cannot
    /// be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout));
        if !config.http2 {
            builder = builder.http1_only();
        }
        let http = builder.build().map_err(|e| PorkbunError::Configuration {
            detail: format!("failed to initialize HTTP transport: {e}"),
        })?;
        Ok(Self {
            http,
            config,
            base_url: API_BASE.to_string(),
            base_url_v4: API_BASE_V4.to_string(),
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// DNS record operations.
    #[must_use]
    pub fn dns(&self) -> Dns<'_> {
        Dns::new(self)
    }

    /// SSL certificate bundle retrieval.
    #[must_use]
    pub fn ssl(&self) -> Ssl<'_> {
        Ssl::new(self)
    }

    /// TLD pricing lookup.
    #[must_use]
    pub fn pricing(&self) -> Pricing<'_> {
        Pricing::new(self)
    }

    /// Point both endpoints at a local mock server.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self.base_url_v4 = self.base_url.clone();
        self
    }

    /// Poll the API host and return the public IP it observed for us.
    ///
    /// With `force_v4` this pins the call to the IPv4-only endpoint, which is
    /// the usual way to check which network path is in effect.
    pub async fn ping(&self, force_v4: bool) -> Result<String> {
        let options = CallOptions::default().force_v4(force_v4);
        let response = self.api_post("/ping", None, &options).await?;
        response
            .get("yourIp")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PorkbunError::ApiFailure {
                http_status: 200,
                body: "ping response missing yourIp".to_string(),
            })
    }

    /// Execute one API call: authenticate, dispatch, classify.
    ///
    /// The payload map is caller-owned and may be reused across calls;
    /// injected credential fields are scrubbed back out on every path,
    /// success or failure, before this method returns.
    ///
    /// # Errors
    ///
    /// - [`PorkbunError::Network`] / [`PorkbunError::Timeout`] once the
    ///   transport retry count is exhausted
    /// - [`PorkbunError::ApiFailure`] when the body is not a JSON object
    /// - [`PorkbunError::Api`] for any HTTP status outside the accepted set
    pub async fn api_post(
        &self,
        path: &str,
        payload: Option<&mut JsonObject>,
        options: &CallOptions,
    ) -> Result<JsonObject> {
        let mut local = JsonObject::new();
        let body = match payload {
            Some(map) => map,
            None => &mut local,
        };

        if options.auth {
            body.insert(
                AUTH_SECRET_FIELD.to_string(),
                Value::String(self.config.api_secret_key.clone()),
            );
            body.insert(
                AUTH_KEY_FIELD.to_string(),
                Value::String(self.config.api_key.clone()),
            );
        }

        let base = if options.force_v4 || self.config.force_v4 {
            &self.base_url_v4
        } else {
            &self.base_url
        };
        let url = format!("{base}{path}");
        let retries = options.retries.unwrap_or(self.config.retries);

        log::debug!("POST {url}");
        log::debug!("Request Body: {}", redact_payload(body));

        let outcome = self.dispatch(&url, body, retries).await;

        // Callers reuse payload maps across calls; never hand the
        // credentials back, whatever the outcome.
        if options.auth {
            body.remove(AUTH_KEY_FIELD);
            body.remove(AUTH_SECRET_FIELD);
        }

        let (http_status, text) = outcome?;

        let Ok(decoded) = serde_json::from_str::<Value>(&text) else {
            log::error!(
                "non-JSON response (HTTP {http_status}): {}",
                truncate_for_log(&text)
            );
            return Err(PorkbunError::ApiFailure {
                http_status,
                body: text,
            });
        };
        let Value::Object(result) = decoded else {
            log::error!("response is JSON but not an object (HTTP {http_status})");
            return Err(PorkbunError::ApiFailure {
                http_status,
                body: text,
            });
        };

        if ACCEPTED_STATUS.contains(&http_status) {
            return Ok(result);
        }

        let status = result
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = result
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        log::warn!("API error (HTTP {http_status}): {status} {message}");
        Err(PorkbunError::Api {
            http_status,
            status,
            message,
        })
    }

    /// Send the request, honoring the rate-limit delay and retrying
    /// transport-level failures up to `max_retries` times. A fixed count, no
    /// backoff; API-level error responses are terminal and never retried.
    async fn dispatch(
        &self,
        url: &str,
        body: &JsonObject,
        max_retries: u32,
    ) -> Result<(u16, String)> {
        if self.config.rate_limit > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(self.config.rate_limit)).await;
        }

        let request = self.http.post(url).json(body);
        if max_retries == 0 {
            return Self::send(request).await;
        }

        let mut last_error = None;
        for attempt in 0..=max_retries {
            let Some(cloned) = request.try_clone() else {
                log::warn!("request body not clonable, sending without retry");
                return Self::send(request).await;
            };
            match Self::send(cloned).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < max_retries && e.is_transient() => {
                    log::warn!(
                        "transport failure (attempt {}/{}): {e}",
                        attempt + 1,
                        max_retries
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| PorkbunError::Network {
            detail: "all retries exhausted with no error captured".to_string(),
        }))
    }

    async fn send(request: RequestBuilder) -> Result<(u16, String)> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PorkbunError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                PorkbunError::Network {
                    detail: e.to_string(),
                }
            }
        })?;

        let http_status = response.status().as_u16();
        log::debug!("Response Status: {http_status}");

        let text = response.text().await.map_err(|e| PorkbunError::Network {
            detail: format!("failed to read response body: {e}"),
        })?;
        log::debug!("Response Body: {}", truncate_for_log(&text));

        Ok((http_status, text))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::builder()
            .read_env(false)
            .api_key("pk1_test")
            .api_secret_key("sk1_test")
            .build()
            .unwrap()
    }

    fn test_client(server: &MockServer) -> Client {
        Client::new(test_config()).unwrap().with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn ping_returns_observed_ip_and_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "yourIp": "198.51.100.45"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ip = client.ping(false).await.unwrap();
        assert_eq!(ip, "198.51.100.45");

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body.get("apikey"), Some(&json!("pk1_test")));
        assert_eq!(body.get("secretapikey"), Some(&json!("sk1_test")));
    }

    #[tokio::test]
    async fn scrubs_credentials_from_caller_payload_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut payload = JsonObject::new();
        payload.insert("content".to_string(), json!("1.2.3.4"));

        client
            .api_post("/dns/create/example.com", Some(&mut payload), &CallOptions::default())
            .await
            .unwrap();

        assert!(!payload.contains_key(AUTH_KEY_FIELD));
        assert!(!payload.contains_key(AUTH_SECRET_FIELD));
        assert_eq!(payload.get("content"), Some(&json!("1.2.3.4")));
    }

    #[tokio::test]
    async fn scrubs_credentials_from_caller_payload_on_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "ERROR",
                "message": "Invalid domain."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let mut payload = JsonObject::new();
        payload.insert("content".to_string(), json!("1.2.3.4"));

        let result = client
            .api_post("/dns/create/example.com", Some(&mut payload), &CallOptions::default())
            .await;

        assert!(result.is_err());
        assert!(!payload.contains_key(AUTH_KEY_FIELD));
        assert!(!payload.contains_key(AUTH_SECRET_FIELD));
    }

    #[tokio::test]
    async fn non_success_status_with_json_body_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "status": "ERROR",
                "message": "Invalid record ID."
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .api_post("/dns/retrieve/example.com", None, &CallOptions::default())
            .await;

        match result {
            Err(PorkbunError::Api {
                http_status,
                status,
                message,
            }) => {
                assert_eq!(http_status, 500);
                assert_eq!(status, "ERROR");
                assert_eq!(message, "Invalid record ID.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_api_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.api_post("/ping", None, &CallOptions::default()).await;

        match result {
            Err(PorkbunError::ApiFailure { http_status, body }) => {
                assert_eq!(http_status, 200);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("expected ApiFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_errors_are_never_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "status": "ERROR",
                "message": "maintenance"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = CallOptions::default().retries(3);
        let result = client.api_post("/ping", None, &options).await;

        assert!(matches!(&result, Err(PorkbunError::Api { .. })));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_after_retries() {
        // Nothing listens on this port; every attempt is refused.
        let config = ClientConfig::builder()
            .read_env(false)
            .api_key("pk1_test")
            .api_secret_key("sk1_test")
            .retries(2)
            .build()
            .unwrap();
        let client = Client::new(config)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let result = client.api_post("/ping", None, &CallOptions::default()).await;
        assert!(
            matches!(&result, Err(e) if e.is_transient()),
            "unexpected result: {result:?}"
        );
    }

    #[tokio::test]
    async fn unauthenticated_calls_send_no_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pricing/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "pricing": {}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .api_post("/pricing/get", None, &CallOptions::unauthenticated())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert!(body.get("apikey").is_none());
        assert!(body.get("secretapikey").is_none());
    }
}
