use thiserror::Error;

use crate::{
    db_types::{AuthorizationError, Order, OrderStatusType},
    order_objects::{CheckoutOutcome, NewCheckout, VerifiedPaymentEvent},
    traits::{
        AccountManagement,
        CartManagement,
        CatalogManagement,
        GatewayError,
        OrderManagement,
        PaymentGateway,
    },
};

/// The highest level of behaviour for backends supporting the storefront engine: the checkout flow (stock
/// reservation + order creation + payment intent) and the reconciliation of gateway events.
#[allow(async_fn_in_trait)]
pub trait StoreDatabase: Clone + AccountManagement + CartManagement + CatalogManagement + OrderManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Creates an order from the user's current cart in a single atomic transaction:
    /// * every cart line's quantity is validated against current stock and the stock is reserved, as one atomic
    ///   read-modify-write per product;
    /// * the order and its item snapshots are persisted in `Pending` status;
    /// * for cash-on-delivery the order moves straight to `Confirmed` and the cart lines are deleted;
    /// * for online modes a payment intent is requested from `gateway` *inside* the open transaction. On success the
    ///   intent reference is stored as the order's `transaction_id` and the order moves to `Payment Initiated`; cart
    ///   lines are retained. On gateway failure the whole transaction rolls back and no state persists.
    async fn checkout<G: PaymentGateway>(
        &self,
        checkout: NewCheckout,
        gateway: &G,
    ) -> Result<CheckoutOutcome, OrderFlowError>;

    /// Applies a verified gateway event to the order identified by the pair (internal order id, external reference),
    /// in a single atomic transaction. Only an order currently in `Payment Initiated` can transition:
    /// * `Captured` moves it to `Confirmed` and deletes the owning user's cart items for the purchased products;
    /// * `Failed` moves it to `Payment Failed` and restores the reserved stock for every order item.
    ///
    /// An event addressed to an already-settled order returns [`OrderFlowError::IllegalTransition`]; an unknown
    /// (id, reference) pair returns [`OrderFlowError::OrderNotFound`]. Both leave the database untouched, which is
    /// what makes duplicate webhook deliveries safe to re-apply.
    async fn apply_gateway_event(&self, event: VerifiedPaymentEvent) -> Result<Order, OrderFlowError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderFlowError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Your cart is empty")]
    CartEmpty,
    #[error("Not enough stock for {name}. Available: {available}, requested: {requested}")]
    InsufficientStock { product_id: i64, name: String, available: i64, requested: i64 },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("No order matches id {order_id} with payment reference {reference}")]
    OrderNotFound { order_id: i64, reference: String },
    #[error("Order {order_id} is in status '{status}' and cannot accept a payment event")]
    IllegalTransition { order_id: i64, status: OrderStatusType },
    #[error("{0}")]
    Unauthorized(#[from] AuthorizationError),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}
