use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use storefront_engine::{CartApi, CatalogApi, OrderFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::RazorpayGateway,
    routes::{
        health,
        AddToCartRoute,
        CheckoutRoute,
        CreateProductRoute,
        DeleteProductRoute,
        MyCartRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        OrderItemsRoute,
        ProductDetailRoute,
        ProductListRoute,
        RemoveCartItemRoute,
        UpdateCartItemRoute,
        UpdateProductRoute,
    },
    webhook_routes::PaymentWebhookRoute,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = RazorpayGateway::new(&config.razorpay)?;
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone());
        let cart_api = CartApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sfs::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(config.razorpay.clone()))
            .service(health)
            .service(CheckoutRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(PaymentWebhookRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(MyCartRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartItemRoute::<SqliteDatabase>::new())
            .service(RemoveCartItemRoute::<SqliteDatabase>::new())
            .service(ProductListRoute::<SqliteDatabase>::new())
            .service(ProductDetailRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(OrderByIdRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(OrderItemsRoute::<SqliteDatabase, RazorpayGateway>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
