use thiserror::Error;

use crate::db_types::{AuthorizationError, NewProduct, Product, ProductUpdate};

/// Product CRUD for the admin back-office, plus the public catalog reads.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    /// Applies a partial update. Returns the updated product, or `ProductNotFound` if the id does not exist.
    async fn update_product(&self, product_id: i64, update: ProductUpdate) -> Result<Product, CatalogApiError>;

    async fn delete_product(&self, product_id: i64) -> Result<(), CatalogApiError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogApiError>;

    /// All products, ordered by name.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("The product update contained no fields to change")]
    EmptyUpdate,
    #[error("{0}")]
    Unauthorized(#[from] AuthorizationError),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
