use log::*;

use crate::{
    db_types::{CartItem, CartLine, Principal, Role},
    traits::{CartApiError, CartManagement},
};

/// Cart operations on behalf of an authenticated customer. Every method checks the principal before touching the
/// database, so handlers can forward requests without their own role logic.
#[derive(Debug, Clone)]
pub struct CartApi<B> {
    db: B,
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B: CartManagement> CartApi<B> {
    /// Add one unit of the product to the caller's cart.
    pub async fn add_to_cart(&self, principal: &Principal, product_id: i64) -> Result<CartItem, CartApiError> {
        principal.require_role(Role::Customer)?;
        let item = self.db.add_to_cart(principal.user_id, product_id).await?;
        debug!("🛒️ User {} has {} of product {} in their cart", principal.user_id, item.quantity, product_id);
        Ok(item)
    }

    /// Set a cart item's quantity. Zero removes the item; values above the available stock are clamped.
    pub async fn set_quantity(
        &self,
        principal: &Principal,
        cart_item_id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, CartApiError> {
        principal.require_role(Role::Customer)?;
        if quantity < 0 {
            return Err(CartApiError::NegativeQuantity);
        }
        let item = self.db.set_cart_quantity(principal.user_id, cart_item_id, quantity).await?;
        match &item {
            Some(i) => debug!("🛒️ Cart item {cart_item_id} set to quantity {}", i.quantity),
            None => debug!("🛒️ Cart item {cart_item_id} removed (quantity set to zero)"),
        }
        Ok(item)
    }

    pub async fn remove_item(&self, principal: &Principal, cart_item_id: i64) -> Result<(), CartApiError> {
        principal.require_role(Role::Customer)?;
        self.db.remove_cart_item(principal.user_id, cart_item_id).await?;
        debug!("🛒️ Cart item {cart_item_id} removed for user {}", principal.user_id);
        Ok(())
    }

    /// The caller's cart with live product data.
    pub async fn fetch_cart(&self, principal: &Principal) -> Result<Vec<CartLine>, CartApiError> {
        principal.require_role(Role::Customer)?;
        self.db.fetch_cart(principal.user_id).await
    }
}
