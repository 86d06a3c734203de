use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use sf_common::Cents;
use storefront_engine::db_types::{Order, PaymentMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub delivery_address: String,
    pub contact_number: String,
    pub payment_mode: PaymentMode,
    /// Defaults to the store currency when omitted.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Everything the frontend needs to open the provider's payment widget for an online order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub gateway_key: String,
    pub reference: String,
    pub amount: Cents,
    pub order_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: String,
}

/// Response body for `POST /checkout`. `payment` is present for online payment modes only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub payment: Option<PaymentSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartQuantityUpdate {
    pub quantity: i64,
}

//--------------------------------------   Webhook envelope   --------------------------------------------------------

/// The provider's webhook event envelope. Only the fields the reconciler needs are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub payment: WebhookPaymentWrapper,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPaymentWrapper {
    pub entity: PaymentEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    /// The provider's payment id.
    pub id: String,
    /// The provider-side order reference the intent was created under.
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub notes: PaymentNotes,
}

/// The metadata we attached at intent creation, echoed back by the provider. Providers round-trip note values
/// inconsistently (sometimes as numbers, sometimes as strings), so both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentNotes {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub internal_order_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let result = match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.parse::<i64>().ok(),
        Some(_) => None,
    };
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn notes_accept_numbers_and_strings() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "payment.captured",
                "payload": { "payment": { "entity": {
                    "id": "pay_29QQoUBi66xm2f",
                    "order_id": "order_9A33XWu170gUtm",
                    "notes": { "internal_order_id": "42", "user_id": 7 }
                }}}
            }"#,
        )
        .unwrap();
        assert_eq!(event.event, "payment.captured");
        let entity = event.payload.payment.entity;
        assert_eq!(entity.id, "pay_29QQoUBi66xm2f");
        assert_eq!(entity.notes.internal_order_id, Some(42));
        assert_eq!(entity.notes.user_id, Some(7));
    }

    #[test]
    fn missing_notes_are_tolerated() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"event": "payment.failed", "payload": { "payment": { "entity": { "id": "pay_1" }}}}"#,
        )
        .unwrap();
        assert_eq!(event.payload.payment.entity.notes.internal_order_id, None);
        assert_eq!(event.payload.payment.entity.notes.user_id, None);
    }
}
