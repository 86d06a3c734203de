//! Data objects exchanged between the order flow API, its callers, and the payment gateway seam.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, PaymentMode},
    traits::PaymentIntent,
};

/// Everything needed to create an order for a user. The cart itself is read from the database inside the checkout
/// transaction; this struct only carries what the cart does not know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCheckout {
    pub user_id: i64,
    pub delivery_address: String,
    pub contact_number: String,
    pub payment_mode: PaymentMode,
    /// ISO currency code passed through to the gateway for online modes.
    pub currency: String,
}

/// The result of a successful checkout. `payment` is present for online payment modes and carries the parameters the
/// shopper needs to complete payment on the client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub payment: Option<PaymentIntent>,
}

/// The payment resolution reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    Captured,
    Failed,
}

impl Display for PaymentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentOutcome::Captured => write!(f, "captured"),
            PaymentOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// A gateway event whose signature has already been verified by the webhook layer. The order is addressed by the
/// *pair* (internal order id, external reference); both must match for the event to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedPaymentEvent {
    pub order_id: i64,
    pub user_id: i64,
    pub reference: String,
    pub outcome: PaymentOutcome,
}
