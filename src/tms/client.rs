//! # TMS Client
//!
//! Thin HTTP transport over the provider's shipment API. Wraps the
//! [`TokenManager`] for session lifecycle and exposes shipment CRUD; the
//! schema work lives in [`crate::tms::mapper`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::TmsConfig;
use crate::constants::{tms_urls, TMS_HTTP_TIMEOUT_SECS};
use crate::error::{FreightError, Result};
use crate::logging::log_tms_operation;
use crate::tms::token::TokenManager;
use crate::tms::wire::{ListShipmentsResponse, ShipmentRequest, ShipmentResponse};

/// Outbound TMS operations consumed by the orchestrator. Split out as a
/// trait so orchestration tests can run against an in-process fake.
#[async_trait]
pub trait TmsService: Send + Sync {
    /// Make sure a usable session token exists, authenticating if needed.
    async fn ensure_authenticated(&self) -> Result<()>;

    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentResponse>;
    async fn get_shipment(&self, id: &str) -> Result<ShipmentResponse>;
    async fn list_shipments(&self, start: i64, page_size: i64) -> Result<ListShipmentsResponse>;
    async fn update_shipment(&self, id: &str, request: &ShipmentRequest)
        -> Result<ShipmentResponse>;
    async fn delete_shipment(&self, id: &str) -> Result<()>;
}

/// HTTP client for the external TMS provider.
pub struct TmsClient {
    config: TmsConfig,
    http: reqwest::Client,
    token_manager: Arc<TokenManager>,
}

impl TmsClient {
    pub fn new(config: TmsConfig) -> Result<Self> {
        let token_manager = Arc::new(TokenManager::new(config.clone())?);
        Self::with_token_manager(config, token_manager)
    }

    pub fn with_token_manager(config: TmsConfig, token_manager: Arc<TokenManager>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TMS_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                FreightError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http,
            token_manager,
        })
    }

    pub fn token_manager(&self) -> Arc<TokenManager> {
        Arc::clone(&self.token_manager)
    }

    fn base_url(&self) -> String {
        if let Some(ref base) = self.config.base_url_override {
            return base.clone();
        }
        if self.config.sandbox {
            tms_urls::SANDBOX_BASE.to_string()
        } else {
            tms_urls::PRODUCTION_BASE.to_string()
        }
    }

    fn shipments_url(&self) -> String {
        format!("{}{}", self.base_url(), tms_urls::SHIPMENTS_PATH)
    }

    async fn authed_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.token_manager.bearer_token().await;
        builder
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.config.api_key)
            .header("Authorization", format!("Bearer {token}"))
    }

    /// Send the request and decode a JSON body, translating transport and
    /// non-2xx outcomes into [`FreightError::RemoteService`].
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| FreightError::remote_service(None, format!("{operation}: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            FreightError::remote_service(Some(status.as_u16()), format!("{operation}: {e}"))
        })?;

        if !status.is_success() {
            return Err(FreightError::remote_service(Some(status.as_u16()), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            FreightError::remote_service(
                Some(status.as_u16()),
                format!("{operation}: failed to decode response: {e}"),
            )
        })
    }
}

#[async_trait]
impl TmsService for TmsClient {
    async fn ensure_authenticated(&self) -> Result<()> {
        self.token_manager.ensure_valid().await
    }

    #[instrument(skip(self, request))]
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentResponse> {
        let url = self.shipments_url();
        debug!(url = %url, "Creating remote shipment");

        let builder = self.authed_request(self.http.post(&url)).await.json(request);
        let response: ShipmentResponse = self.send_json(builder, "create_shipment").await?;
        log_tms_operation(
            "create_shipment",
            Some(&response.id.to_string()),
            "created",
            None,
        );
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn get_shipment(&self, id: &str) -> Result<ShipmentResponse> {
        let url = format!("{}/{id}", self.shipments_url());
        let builder = self.authed_request(self.http.get(&url)).await;
        self.send_json(builder, "get_shipment").await
    }

    #[instrument(skip(self))]
    async fn list_shipments(&self, start: i64, page_size: i64) -> Result<ListShipmentsResponse> {
        let url = format!(
            "{}/list?start={start}&pageSize={page_size}",
            self.shipments_url()
        );
        let builder = self.authed_request(self.http.get(&url)).await;
        self.send_json(builder, "list_shipments").await
    }

    #[instrument(skip(self, request))]
    async fn update_shipment(
        &self,
        id: &str,
        request: &ShipmentRequest,
    ) -> Result<ShipmentResponse> {
        let url = format!("{}/{id}", self.shipments_url());
        let builder = self.authed_request(self.http.put(&url)).await.json(request);
        self.send_json(builder, "update_shipment").await
    }

    #[instrument(skip(self))]
    async fn delete_shipment(&self, id: &str) -> Result<()> {
        let url = format!("{}/{id}", self.shipments_url());
        let builder = self.authed_request(self.http.delete(&url)).await;

        let response = builder
            .send()
            .await
            .map_err(|e| FreightError::remote_service(None, format!("delete_shipment: {e}")))?;

        let status = response.status();
        // The provider answers deletes with 200 or 204 depending on the
        // shipment's state.
        if status == reqwest::StatusCode::OK || status == reqwest::StatusCode::NO_CONTENT {
            log_tms_operation("delete_shipment", Some(id), "deleted", None);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(FreightError::remote_service(Some(status.as_u16()), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FreightConfig;

    fn client_with(sandbox: bool, base_url_override: Option<String>) -> TmsClient {
        let mut config = FreightConfig::default().tms;
        config.sandbox = sandbox;
        config.base_url_override = base_url_override;
        TmsClient::new(config).unwrap()
    }

    #[test]
    fn test_sandbox_base_url() {
        let client = client_with(true, None);
        assert_eq!(
            client.shipments_url(),
            "https://my-sandbox-publicapi.turvo.com/v1/shipments"
        );
    }

    #[test]
    fn test_production_base_url() {
        let client = client_with(false, None);
        assert_eq!(
            client.shipments_url(),
            "https://publicapi.turvo.com/v1/shipments"
        );
    }

    #[test]
    fn test_base_url_override_wins() {
        let client = client_with(true, Some("http://localhost:9999/v1".to_string()));
        assert_eq!(client.shipments_url(), "http://localhost:9999/v1/shipments");
    }
}
