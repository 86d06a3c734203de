use log::*;

use crate::{
    db_types::{NewProduct, Principal, Product, ProductUpdate, Role},
    traits::{CatalogApiError, CatalogManagement},
};

/// Catalog reads (public) and mutations (admin only).
#[derive(Debug, Clone)]
pub struct CatalogApi<B> {
    db: B,
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B: CatalogManagement> CatalogApi<B> {
    pub async fn add_product(&self, principal: &Principal, product: NewProduct) -> Result<Product, CatalogApiError> {
        principal.require_role(Role::Admin)?;
        let product = self.db.insert_product(product).await?;
        info!("🛍️ Product #{} '{}' added to the catalog at {}", product.id, product.name, product.price);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        principal: &Principal,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<Product, CatalogApiError> {
        principal.require_role(Role::Admin)?;
        if update.is_empty() {
            return Err(CatalogApiError::EmptyUpdate);
        }
        let product = self.db.update_product(product_id, update).await?;
        info!("🛍️ Product #{product_id} updated");
        Ok(product)
    }

    pub async fn delete_product(&self, principal: &Principal, product_id: i64) -> Result<(), CatalogApiError> {
        principal.require_role(Role::Admin)?;
        self.db.delete_product(product_id).await?;
        info!("🛍️ Product #{product_id} removed from the catalog");
        Ok(())
    }

    pub async fn fetch_product(&self, product_id: i64) -> Result<Product, CatalogApiError> {
        self.db.fetch_product(product_id).await?.ok_or(CatalogApiError::ProductNotFound(product_id))
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products().await
    }
}
