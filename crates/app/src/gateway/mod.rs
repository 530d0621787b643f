//! Payment Gateway
//!
//! Checkout creates a remote order before opening its transaction; the shopper pays against it in
//! the browser and the gateway's signed callback settles the local payment.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use thiserror::Error;

mod razorpay;

pub use razorpay::{GatewayConfig, RazorpayGateway};

/// Order to create at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGatewayOrder {
    /// Amount in minor units
    pub amount: u64,

    /// ISO currency code
    pub currency: String,

    /// Our reference for the order, echoed back by the gateway
    pub receipt: String,
}

/// Order as issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key the shopper's browser opens the payment widget with.
    fn key_id(&self) -> String;

    /// Create a remote order the shopper can pay against.
    async fn create_order(&self, order: CreateGatewayOrder) -> Result<GatewayOrder, GatewayError>;
}
