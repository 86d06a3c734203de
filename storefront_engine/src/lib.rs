//! Storefront Engine
//!
//! The storefront engine holds the core logic for the online store: the inventory ledger, the order state machine,
//! and the reconciliation of externally-reported payment outcomes. It is payment-provider agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`OrderFlowApi`], [`CartApi`], [`CatalogApi`]). This provides the public-facing
//!    functionality of the store. Backends need to implement the traits in [`traits`] in order to act as a backend
//!    for the storefront server.
pub mod db_types;
pub mod order_objects;
mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "sqlite")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sfe_api::{cart_api::CartApi, catalog_api::CatalogApi, order_flow_api::OrderFlowApi};
