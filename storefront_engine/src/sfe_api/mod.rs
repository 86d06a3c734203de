pub mod cart_api;
pub mod catalog_api;
pub mod order_flow_api;
