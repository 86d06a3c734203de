//! `SqliteDatabase` is a concrete implementation of a Storefront Engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sf_common::Cents;
use sqlx::SqlitePool;

use super::db::{carts, db_url, new_pool, orders, products, users};
use crate::{
    db_types::{CartItem, CartLine, NewProduct, Order, OrderItem, OrderStatusType, Product, ProductUpdate, User},
    order_objects::{CheckoutOutcome, NewCheckout, PaymentOutcome, VerifiedPaymentEvent},
    traits::{
        AccountApiError,
        AccountManagement,
        CartApiError,
        CartManagement,
        CatalogApiError,
        CatalogManagement,
        IntentRequest,
        OrderApiError,
        OrderFlowError,
        OrderManagement,
        PaymentGateway,
        StoreDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the database URL from the `SF_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StoreDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Converts the user's cart into an order, in one atomic transaction:
    /// * Every cart line's stock is reserved with a guarded decrement. A line that cannot be covered aborts the
    ///   whole checkout with `InsufficientStock`, rolling back any reservations already made.
    /// * The order and its item snapshots are inserted in `Pending`.
    /// * For online payment modes, a payment intent is created at the gateway *inside* the transaction. A gateway
    ///   error rolls everything back: no order row, no stock change, cart untouched. On success the order moves to
    ///   `Payment Initiated` carrying the gateway reference, and the cart is kept until the payment resolves.
    /// * Cash-on-delivery orders move straight to `Confirmed` and the purchased cart items are cleared.
    ///
    /// The cart is read *before* the transaction opens, so the first write of the transaction is the stock
    /// reservation itself. Concurrent checkouts for the last unit serialize there and the loser sees the
    /// decremented stock.
    async fn checkout<G: PaymentGateway>(
        &self,
        checkout: NewCheckout,
        gateway: &G,
    ) -> Result<CheckoutOutcome, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let lines = carts::fetch_cart_lines(checkout.user_id, &mut conn).await?;
        drop(conn);
        if lines.is_empty() {
            return Err(OrderFlowError::CartEmpty);
        }
        let total = lines.iter().map(CartLine::line_total).sum::<Cents>();
        let mut tx = self.pool.begin().await?;
        for line in &lines {
            let reserved = products::reserve_stock(line.product_id, line.quantity, &mut tx).await?;
            if !reserved {
                let available =
                    products::fetch_product_by_id(line.product_id, &mut tx).await?.map(|p| p.stock).unwrap_or(0);
                debug!(
                    "🛒️ Checkout for user {} aborted. Wanted {} of product #{} but only {available} remain.",
                    checkout.user_id, line.quantity, line.product_id
                );
                return Err(OrderFlowError::InsufficientStock {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    available,
                    requested: line.quantity,
                });
            }
        }
        let order = orders::insert_order(&checkout, total, &mut tx).await?;
        orders::insert_order_items(order.id, &lines, &mut tx).await?;
        let (order, payment) = if checkout.payment_mode.is_online() {
            let request = IntentRequest {
                order_id: order.id,
                user_id: order.user_id,
                amount: total,
                currency: checkout.currency.clone(),
            };
            let intent = gateway.create_intent(&request).await?;
            let order = orders::set_payment_initiated(order.id, &intent.reference, &mut tx).await?;
            (order, Some(intent))
        } else {
            let order = orders::update_order_status(order.id, OrderStatusType::Confirmed, &mut tx).await?;
            let n = carts::clear_purchased_items(order.user_id, order.id, &mut tx).await?;
            trace!("🛒️ {n} cart item(s) cleared for user {} at cash-on-delivery checkout", order.user_id);
            (order, None)
        };
        tx.commit().await?;
        Ok(CheckoutOutcome { order, payment })
    }

    /// Applies a verified gateway event to its order.
    ///
    /// The transition is guarded by a single conditional update: the order must still be in `Payment Initiated` and
    /// must carry the event's gateway reference. When two deliveries of the same event race, exactly one passes the
    /// guard; the other reports `IllegalTransition` and changes nothing. Captured payments clear the purchased cart
    /// items; failed payments return the reserved stock to the shelf.
    async fn apply_gateway_event(&self, event: VerifiedPaymentEvent) -> Result<Order, OrderFlowError> {
        let new_status = match event.outcome {
            PaymentOutcome::Captured => OrderStatusType::Confirmed,
            PaymentOutcome::Failed => OrderStatusType::PaymentFailed,
        };
        let mut tx = self.pool.begin().await?;
        let settled = orders::settle_payment_event(event.order_id, &event.reference, new_status, &mut tx).await?;
        let order = match settled {
            Some(order) => order,
            None => {
                let existing = orders::fetch_order_by_id(event.order_id, &mut tx).await?;
                return match existing {
                    Some(order) if order.transaction_id.as_deref() == Some(event.reference.as_str()) => {
                        Err(OrderFlowError::IllegalTransition { order_id: order.id, status: order.status })
                    },
                    _ => Err(OrderFlowError::OrderNotFound { order_id: event.order_id, reference: event.reference }),
                };
            },
        };
        match event.outcome {
            PaymentOutcome::Captured => {
                let n = carts::clear_purchased_items(order.user_id, order.id, &mut tx).await?;
                debug!("🗃️ Order #{} captured. {n} cart item(s) cleared for user {}", order.id, order.user_id);
            },
            PaymentOutcome::Failed => {
                let items = orders::fetch_order_items(order.id, &mut tx).await?;
                for item in &items {
                    products::release_stock(item.product_id, item.quantity, &mut tx).await?;
                }
                debug!("🗃️ Order #{} failed at the gateway. Stock restored for {} line(s)", order.id, items.len());
            },
        }
        tx.commit().await?;
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), OrderFlowError> {
        self.pool.close().await;
        Ok(())
    }
}

impl CartManagement for SqliteDatabase {
    async fn add_to_cart(&self, user_id: i64, product_id: i64) -> Result<CartItem, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::add_one_to_cart(user_id, product_id, &mut conn).await
    }

    async fn set_cart_quantity(
        &self,
        user_id: i64,
        cart_item_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::set_quantity(user_id, cart_item_id, quantity, &mut conn).await
    }

    async fn remove_cart_item(&self, user_id: i64, cart_item_id: i64) -> Result<(), CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::remove_item(user_id, cart_item_id, &mut conn).await
    }

    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        let lines = carts::fetch_cart_lines(user_id, &mut conn).await?;
        Ok(lines)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(product_id, update, &mut conn).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::delete_product(product_id, &mut conn).await
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product_by_id(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = products::fetch_all_products(&mut conn).await?;
        Ok(result)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_order_items(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(result)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_id(user_id, &mut conn).await?;
        Ok(user)
    }
}
