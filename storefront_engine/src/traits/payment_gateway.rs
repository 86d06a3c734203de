use serde::{Deserialize, Serialize};
use sf_common::Cents;
use thiserror::Error;

/// A request for a remote payment intent. The internal order id and user id travel in the request so the provider
/// echoes them back in webhook notifications, which is how the reconciler finds its way back to the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRequest {
    pub order_id: i64,
    pub user_id: i64,
    /// Amount in the gateway's minor currency unit.
    pub amount: Cents,
    pub currency: String,
}

/// The provider-side record authorising a charge, plus the client-facing parameters needed to complete payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// The opaque external reference for the intent. Stored as the order's `transaction_id`.
    pub reference: String,
    /// The public client key the frontend uses to open the provider's payment widget.
    pub client_key: String,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),
}

/// The seam between the order flow and a concrete payment provider.
///
/// Implementations must be synchronous from the caller's point of view (one bounded request/response) and must not
/// mutate any local state on failure; the enclosing checkout transaction owns rollback.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError>;
}
