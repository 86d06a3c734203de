//! Helpers for setting up integration test environments. Only compiled with the `sqlite` feature.

pub mod gateway;
pub mod prepare_env;
pub mod seed;
