use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderItem, PaymentMode, Principal, Role},
    order_objects::{CheckoutOutcome, NewCheckout, VerifiedPaymentEvent},
    traits::{OrderApiError, OrderFlowError, OrderManagement, PaymentGateway, StoreDatabase},
};

/// `OrderFlowApi` is the primary API for creating orders at checkout and for resolving them in response to payment
/// gateway events. It drives the order state machine:
///
/// `Pending → Payment Initiated → {Confirmed | Payment Failed}`, or `Pending → Confirmed` for cash-on-delivery.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    /// Submit a checkout for the calling principal's cart.
    ///
    /// The stock-sufficiency check, the stock reservation and the order insertion happen atomically with respect to
    /// concurrent checkouts on the same products. For online payment modes the gateway call happens inside the same
    /// transaction, so a gateway failure leaves no trace: no order row, no stock decrement, cart untouched.
    pub async fn checkout(
        &self,
        principal: &Principal,
        checkout: NewCheckout,
    ) -> Result<CheckoutOutcome, OrderFlowError> {
        principal.require_role(Role::Customer)?;
        principal.require_self_or_admin(checkout.user_id)?;
        let mode = checkout.payment_mode;
        let outcome = self.db.checkout(checkout, &self.gateway).await?;
        match mode {
            PaymentMode::CashOnDelivery => {
                info!("📦️ Order #{} placed via cash-on-delivery and confirmed. Cart cleared.", outcome.order.id);
            },
            _ => {
                let reference = outcome.order.transaction_id.as_deref().unwrap_or("???");
                info!(
                    "📦️ Order #{} created. Payment intent [{reference}] issued for {}. Awaiting gateway outcome.",
                    outcome.order.id, outcome.order.total
                );
            },
        }
        Ok(outcome)
    }

    /// Apply a verified gateway event to its order. Invoked by the webhook reconciler only.
    ///
    /// Repeat deliveries of the same event are absorbed: the status guard (`Payment Initiated`) is evaluated fresh
    /// inside the transaction, so the second application reports [`OrderFlowError::IllegalTransition`] and mutates
    /// nothing.
    pub async fn apply_gateway_event(&self, event: VerifiedPaymentEvent) -> Result<Order, OrderFlowError> {
        trace!("🔄️ Applying {} event for order #{} [{}]", event.outcome, event.order_id, event.reference);
        let order = self.db.apply_gateway_event(event.clone()).await?;
        info!(
            "🔄️ Payment {} for order #{} [{}]. Order is now '{}'.",
            event.outcome, order.id, event.reference, order.status
        );
        Ok(order)
    }

    /// Fetch a single order. Only the owner or an admin may read it.
    pub async fn fetch_order(&self, principal: &Principal, order_id: i64) -> Result<Order, OrderApiError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
        principal.require_self_or_admin(order.user_id)?;
        Ok(order)
    }

    /// The item snapshots for an order. Same visibility rules as [`Self::fetch_order`].
    pub async fn fetch_order_items(
        &self,
        principal: &Principal,
        order_id: i64,
    ) -> Result<Vec<OrderItem>, OrderApiError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
        principal.require_self_or_admin(order.user_id)?;
        self.db.fetch_order_items(order_id).await
    }

    /// The calling principal's orders, newest first.
    pub async fn my_orders(&self, principal: &Principal) -> Result<Vec<Order>, OrderApiError> {
        principal.require_role(Role::Customer)?;
        self.db.fetch_orders_for_user(principal.user_id).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
