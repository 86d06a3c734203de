//! # Storefront server
//! This module hosts the HTTP layer for the storefront. It is responsible for:
//! Accepting checkout submissions and cart/catalog requests from the web frontend.
//! Listening for incoming payment webhook notifications from the payment provider.
//! Verifying webhook signatures and handing verified events to the order flow engine.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/checkout`: Converts the caller's cart into an order, creating a payment intent for online modes.
//! * `/webhook/payment`: The webhook route for receiving payment events from the provider.
//! * `/cart`, `/products`, `/orders`: Cart management, catalog and order queries.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
