//! Payment Gateway Config

use std::{fmt, time::Duration};

use clap::Args;
use zeroize::Zeroizing;

/// Payment gateway credentials and callback secret.
#[derive(Args)]
pub struct GatewayConfig {
    /// Gateway API base URL
    #[arg(long, env = "GATEWAY_BASE_URL", default_value = "https://api.razorpay.com")]
    pub gateway_base_url: String,

    /// Public key id, also handed to the browser checkout widget
    #[arg(long, env = "GATEWAY_KEY_ID")]
    pub gateway_key_id: String,

    /// API key secret
    #[arg(long, env = "GATEWAY_KEY_SECRET", hide_env_values = true)]
    pub gateway_key_secret: String,

    /// Shared secret gateway callbacks are signed with
    #[arg(long, env = "GATEWAY_WEBHOOK_SECRET", hide_env_values = true)]
    pub gateway_webhook_secret: String,

    /// Upper bound on a single gateway request, in seconds
    #[arg(long, env = "GATEWAY_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub gateway_timeout_seconds: u64,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("gateway_base_url", &self.gateway_base_url)
            .field("gateway_key_id", &self.gateway_key_id)
            .field("gateway_key_secret", &"<redacted>")
            .field("gateway_webhook_secret", &"<redacted>")
            .field("gateway_timeout_seconds", &self.gateway_timeout_seconds)
            .finish()
    }
}

impl GatewayConfig {
    /// Split into the gateway client settings and the callback secret.
    pub(crate) fn into_parts(self) -> (settle_app::gateway::GatewayConfig, Zeroizing<String>) {
        (
            settle_app::gateway::GatewayConfig {
                base_url: self.gateway_base_url,
                key_id: self.gateway_key_id,
                key_secret: Zeroizing::new(self.gateway_key_secret),
                timeout: Duration::from_secs(self.gateway_timeout_seconds),
            },
            Zeroizing::new(self.gateway_webhook_secret),
        )
    }
}
