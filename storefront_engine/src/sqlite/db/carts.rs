use sqlx::SqliteConnection;

use crate::{
    db_types::{CartItem, CartLine},
    sqlite::db::products,
    traits::CartApiError,
};

/// Adds one unit of the product to the user's cart, creating the cart item on first add.
/// The cart item quantity can never exceed the product's current stock.
pub async fn add_one_to_cart(
    user_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<CartItem, CartApiError> {
    let product = products::fetch_product_by_id(product_id, conn)
        .await?
        .ok_or(CartApiError::ProductNotFound(product_id))?;
    let existing = fetch_cart_item(user_id, product_id, conn).await?;
    let desired = existing.as_ref().map(|i| i.quantity + 1).unwrap_or(1);
    if desired > product.stock {
        return Err(CartApiError::OutOfStock { product_id, name: product.name });
    }
    let item = match existing {
        Some(item) => {
            sqlx::query_as("UPDATE cart_items SET quantity = quantity + 1 WHERE id = $1 RETURNING *")
                .bind(item.id)
                .fetch_one(conn)
                .await?
        },
        None => {
            sqlx::query_as("INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, 1) RETURNING *")
                .bind(user_id)
                .bind(product_id)
                .fetch_one(conn)
                .await?
        },
    };
    Ok(item)
}

/// Sets the cart item's quantity. Zero deletes the item and returns `None`. Quantities above the product's current
/// stock are clamped to the stock level (which can also mean deletion, if the product has sold out).
pub async fn set_quantity(
    user_id: i64,
    cart_item_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, CartApiError> {
    let item: CartItem = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_item_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(CartApiError::ItemNotFound(cart_item_id))?;
    let product = products::fetch_product_by_id(item.product_id, conn)
        .await?
        .ok_or(CartApiError::ProductNotFound(item.product_id))?;
    let clamped = quantity.min(product.stock);
    if clamped <= 0 {
        sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(cart_item_id).execute(conn).await?;
        return Ok(None);
    }
    let item = sqlx::query_as("UPDATE cart_items SET quantity = $1 WHERE id = $2 RETURNING *")
        .bind(clamped)
        .bind(cart_item_id)
        .fetch_one(conn)
        .await?;
    Ok(Some(item))
}

pub async fn remove_item(user_id: i64, cart_item_id: i64, conn: &mut SqliteConnection) -> Result<(), CartApiError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_item_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CartApiError::ItemNotFound(cart_item_id));
    }
    Ok(())
}

pub async fn fetch_cart_item(
    user_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(conn)
        .await
}

/// The user's cart joined with live product data, in insertion order.
pub async fn fetch_cart_lines(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT
                ci.id AS cart_item_id,
                p.id AS product_id,
                p.name AS name,
                p.price AS unit_price,
                ci.quantity AS quantity,
                p.stock AS stock
            FROM cart_items ci JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.id;
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// Removes the cart items that were converted into the given order. Items the user added after checkout (or for
/// other products) are left alone.
pub async fn clear_purchased_items(
    user_id: i64,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            DELETE FROM cart_items
            WHERE user_id = $1
            AND product_id IN (SELECT product_id FROM order_items WHERE order_id = $2)
        "#,
    )
    .bind(user_id)
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
