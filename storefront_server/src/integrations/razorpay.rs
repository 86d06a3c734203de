//! The Razorpay implementation of the engine's payment gateway seam.
//!
//! Checkout creates a Razorpay "order" (their name for a payment intent) over the Orders API. The internal order id
//! and user id ride along in the `notes` object, which Razorpay echoes back verbatim in webhook payloads; that echo
//! is what lets the webhook reconciler find its way back to our order.

use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use sf_common::Secret;
use storefront_engine::traits::{GatewayError, IntentRequest, PaymentGateway, PaymentIntent};

use crate::{config::RazorpayConfig, errors::ServerError};

#[derive(Clone)]
pub struct RazorpayGateway {
    client: Client,
    api_key: String,
    api_secret: Secret<String>,
    base_url: String,
}

impl RazorpayGateway {
    pub fn new(config: &RazorpayConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServerError::ConfigurationError(format!("Could not build the gateway HTTP client. {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl PaymentGateway for RazorpayGateway {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{}/v1/orders", self.base_url);
        let payload = json!({
            "amount": request.amount.value(),
            "currency": request.currency,
            "receipt": format!("order_rcpt_{}", request.order_id),
            "notes": {
                "internal_order_id": request.order_id,
                "user_id": request.user_id,
            },
        });
        debug!("💳️ Requesting payment intent for order #{} ({})", request.order_id, request.amount);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.api_key, Some(self.api_secret.reveal()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("💳️ Payment gateway request did not complete. {e}");
                GatewayError::Unavailable(e.to_string())
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("💳️ Payment gateway rejected intent for order #{}. {status}: {body}", request.order_id);
            return Err(match status {
                StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                    GatewayError::Unavailable(format!("Gateway returned {status}"))
                },
                _ => GatewayError::Rejected(format!("Gateway returned {status}: {body}")),
            });
        }
        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Rejected(format!("Gateway returned an unreadable response. {e}")))?;
        debug!("💳️ Payment intent [{}] created for order #{}", order.id, request.order_id);
        Ok(PaymentIntent { reference: order.id, client_key: self.api_key.clone() })
    }
}

/// The slice of Razorpay's order entity we care about.
#[derive(Debug, Clone, Deserialize)]
struct RazorpayOrder {
    id: String,
}
