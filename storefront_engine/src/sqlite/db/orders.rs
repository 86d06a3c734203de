use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{CartLine, Order, OrderItem, OrderStatusType},
    order_objects::NewCheckout,
};
use sf_common::Cents;

/// Inserts a new order in the `Pending` state. This is not atomic on its own. Checkout embeds this call inside a
/// transaction, after the stock reservations, and passes `&mut tx` as the connection argument.
pub async fn insert_order(
    checkout: &NewCheckout,
    total: Cents,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, total, delivery_address, contact_number, payment_mode, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(checkout.user_id)
    .bind(total)
    .bind(checkout.delivery_address.as_str())
    .bind(checkout.contact_number.as_str())
    .bind(checkout.payment_mode)
    .bind(OrderStatusType::Pending)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order #{} inserted for user {} at {}", order.id, order.user_id, order.total);
    Ok(order)
}

/// Snapshots the purchased lines against the order. `unit_price` is frozen at the price paid.
pub async fn insert_order_items(
    order_id: i64,
    lines: &[CartLine],
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    for line in lines {
        sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)")
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

/// All orders placed by the user, newest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_one(conn)
        .await
}

/// Attaches the gateway reference to the order and moves it to `Payment Initiated`.
pub async fn set_payment_initiated(
    id: i64,
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders SET status = $1, transaction_id = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
            RETURNING *;
        "#,
    )
    .bind(OrderStatusType::PaymentInitiated)
    .bind(reference)
    .bind(id)
    .fetch_one(conn)
    .await
}

/// The guarded transition at the heart of webhook reconciliation. Moves the order to `new_status` if, and only if,
/// it is still in `Payment Initiated` *and* carries the expected gateway reference. Returns `None` when the guard
/// does not hold, in which case nothing was changed.
///
/// Concurrent deliveries of the same event race on this single statement; exactly one of them wins.
pub async fn settle_payment_event(
    order_id: i64,
    reference: &str,
    new_status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND transaction_id = $3 AND status = $4
            RETURNING *;
        "#,
    )
    .bind(new_status)
    .bind(order_id)
    .bind(reference)
    .bind(OrderStatusType::PaymentInitiated)
    .fetch_optional(conn)
    .await
}
