//! Razorpay Orders API client.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::gateway::{CreateGatewayOrder, GatewayError, GatewayOrder, PaymentGateway};

/// Configuration for connecting to the gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// API base URL, e.g. `"https://api.razorpay.com"`.
    pub base_url: String,

    pub key_id: String,

    pub key_secret: Zeroizing<String>,

    /// Upper bound on a single gateway request.
    pub timeout: Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct OrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,

    /// Capture automatically once the shopper pays
    payment_capture: u8,
}

impl<'a> From<&'a CreateGatewayOrder> for OrderRequest<'a> {
    fn from(order: &'a CreateGatewayOrder) -> Self {
        Self {
            amount: order.amount,
            currency: &order.currency,
            receipt: &order.receipt,
            payment_capture: 1,
        }
    }
}

/// HTTP client for the gateway's orders API.
#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    config: GatewayConfig,
    http: Client,
}

impl RazorpayGateway {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> String {
        self.config.key_id.clone()
    }

    #[tracing::instrument(
        name = "gateway.create_order",
        skip(self, order),
        fields(amount = order.amount, receipt = %order.receipt),
        err
    )]
    async fn create_order(&self, order: CreateGatewayOrder) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.as_str()))
            .json(&OrderRequest::from(&order))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "order request failed with status {status}: {text}"
            )));
        }

        let created: GatewayOrder = response.json().await?;

        if created.amount != order.amount {
            return Err(GatewayError::UnexpectedResponse(format!(
                "gateway order {} is for {} but {} was requested",
                created.id, created.amount, order.amount
            )));
        }

        Ok(created)
    }
}
