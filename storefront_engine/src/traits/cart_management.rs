use thiserror::Error;

use crate::db_types::{AuthorizationError, CartItem, CartLine};

/// Cart mutations and reads. All operations are scoped to a single user; the quantity of any cart item stays within
/// `[1, product.stock]` for as long as the item exists.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Adds one unit of the product to the user's cart, creating the cart item if needed. Adding beyond the
    /// product's stock (or adding an out-of-stock product) fails with `OutOfStock`.
    async fn add_to_cart(&self, user_id: i64, product_id: i64) -> Result<CartItem, CartApiError>;

    /// Sets the quantity of a cart item. A quantity of zero removes the item (returning `None`); a quantity above
    /// the available stock is clamped to the stock level.
    async fn set_cart_quantity(
        &self,
        user_id: i64,
        cart_item_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartApiError>;

    async fn remove_cart_item(&self, user_id: i64, cart_item_id: i64) -> Result<(), CartApiError>;

    /// The user's cart joined with live product data, ordered by insertion.
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("{name} is out of stock")]
    OutOfStock { product_id: i64, name: String },
    #[error("Cart item {0} does not exist")]
    ItemNotFound(i64),
    #[error("Quantity cannot be negative")]
    NegativeQuantity,
    #[error("{0}")]
    Unauthorized(#[from] AuthorizationError),
}

impl From<sqlx::Error> for CartApiError {
    fn from(e: sqlx::Error) -> Self {
        CartApiError::DatabaseError(e.to_string())
    }
}
