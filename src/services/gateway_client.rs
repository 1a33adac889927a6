use crate::app::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{FormattedChargeRequest, GatewayResponse};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{redirect, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

const PROCESS_TRANSACTION_PATH: &str = "/exams/processTransaction";

/// Sends a single charge to the payment gateway.
#[async_trait]
pub trait ChargeGateway: Send + Sync {
    async fn charge(
        &self,
        endpoint: &str,
        access_token: &str,
        request: &FormattedChargeRequest,
    ) -> Result<GatewayResponse, GatewayError>;
}

/// HTTPS client for the PAGCOMPLETO `processTransaction` API.
///
/// Certificates are always verified.
pub struct PagcompletoClient {
    client: Client,
    default_base_url: Url,
}

impl PagcompletoClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let default_base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid gateway base url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            default_base_url,
        })
    }

    /// `processTransaction` URL for an order's gateway endpoint. Falls back
    /// to the configured base URL when the endpoint is blank or unusable.
    pub fn transaction_url(&self, endpoint: &str, access_token: &str) -> Url {
        let mut url = Url::parse(endpoint.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or_else(|| {
                if !endpoint.trim().is_empty() {
                    warn!("Ignoring unusable gateway endpoint {:?}", endpoint);
                }
                self.default_base_url.clone()
            });

        url.set_path(PROCESS_TRANSACTION_PATH);
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair("accessToken", access_token);
        url
    }
}

#[async_trait]
impl ChargeGateway for PagcompletoClient {
    async fn charge(
        &self,
        endpoint: &str,
        access_token: &str,
        request: &FormattedChargeRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = self.transaction_url(endpoint, access_token);
        let host = url.host_str().unwrap_or_default().to_string();

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Charge for order {} did not reach {}: {}", request.external_order_id, host, e.without_url());
                GatewayError::Transport(format!("request to {} failed", host))
            })?;

        let status = response.status();
        let body = response.text().await?;

        debug!("[PagcompletoClient] order {} HTTP_CODE: {}", request.external_order_id, status);
        debug!("[PagcompletoClient] order {} RAW_RESPONSE: {}", request.external_order_id, body);

        if !status.is_success() {
            warn!("Gateway returned status {} for order {}", status, request.external_order_id);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Undecodable gateway body for order {}: {}", request.external_order_id, e);
            GatewayError::Protocol(format!("HTTP {} with non-JSON body", status.as_u16()))
        })?;

        let decoded = GatewayResponse::from_value(value)?;
        info!(
            "Gateway answered order {} with code {:?}",
            request.external_order_id, decoded.transaction_code
        );
        Ok(decoded)
    }
}
