//! TLD pricing lookup.

use crate::client::{CallOptions, Client};
use crate::error::{PorkbunError, Result};
use crate::types::PricingTable;

/// Pricing operations on a [`Client`].
pub struct Pricing<'a> {
    client: &'a Client,
}

impl<'a> Pricing<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch the default pricing table for every supported TLD.
    ///
    /// This endpoint takes no credentials, so it works before any are
    /// configured.
    pub async fn get(&self) -> Result<PricingTable> {
        let mut response = self
            .client
            .api_post("/pricing/get", None, &CallOptions::unauthenticated())
            .await?;
        let Some(pricing) = response.remove("pricing") else {
            return Err(PorkbunError::ApiFailure {
                http_status: 200,
                body: "pricing response missing pricing object".to_string(),
            });
        };
        let tlds = serde_json::from_value(pricing).map_err(|e| PorkbunError::ApiFailure {
            http_status: 200,
            body: format!("malformed pricing object: {e}"),
        })?;
        Ok(PricingTable { tlds })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::ClientConfig;

    fn test_client(server: &MockServer) -> Client {
        let config = ClientConfig::builder()
            .read_env(false)
            .api_key("pk1_test")
            .api_secret_key("sk1_test")
            .build()
            .unwrap();
        Client::new(config).unwrap().with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn fetches_pricing_without_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pricing/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "pricing": {
                    "com": {
                        "registration": "9.68",
                        "renewal": "11.06",
                        "transfer": "9.68",
                        "coupons": []
                    },
                    "dev": {
                        "registration": "11.55",
                        "renewal": "13.62",
                        "transfer": "11.55"
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let table = client.pricing().get().await.unwrap();

        assert_eq!(table.tlds.len(), 2);
        assert_eq!(table.tlds["com"].registration, "9.68");
        assert!(table.tlds["dev"].coupons.is_empty());

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert!(body.get("apikey").is_none());
        assert!(body.get("secretapikey").is_none());
    }

    #[tokio::test]
    async fn missing_pricing_object_is_api_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.pricing().get().await;
        assert!(
            matches!(&result, Err(PorkbunError::ApiFailure { .. })),
            "unexpected result: {result:?}"
        );
    }
}
