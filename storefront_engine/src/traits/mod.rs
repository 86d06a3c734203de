//! The traits a backend must implement in order to power the storefront server, plus the [`PaymentGateway`] seam
//! that online checkout flows drive.

mod account_management;
mod cart_management;
mod catalog_management;
mod order_management;
mod payment_gateway;
mod store_database;

pub use account_management::{AccountApiError, AccountManagement};
pub use cart_management::{CartApiError, CartManagement};
pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use order_management::{OrderApiError, OrderManagement};
pub use payment_gateway::{GatewayError, IntentRequest, PaymentGateway, PaymentIntent};
pub use store_database::{OrderFlowError, StoreDatabase};
