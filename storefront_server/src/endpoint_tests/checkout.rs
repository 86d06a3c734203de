use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::json;
use sf_common::Cents;
use storefront_engine::{
    test_utils::seed::{add_cart_item, seed_product, seed_user},
    traits::{GatewayError, PaymentIntent},
    OrderFlowApi,
    SqliteDatabase,
};

use super::{
    helpers::{as_user, new_test_db},
    mocks::MockGateway,
};
use crate::routes::CheckoutRoute;

async fn post_checkout(
    db: SqliteDatabase,
    gateway: MockGateway,
    req: TestRequest,
) -> (StatusCode, serde_json::Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OrderFlowApi::new(db, gateway)))
            .service(CheckoutRoute::<SqliteDatabase, MockGateway>::new()),
    )
    .await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(res).await).unwrap_or(json!({}));
    (status, body)
}

fn checkout_body(mode: &str) -> serde_json::Value {
    json!({
        "delivery_address": "12 Main Road",
        "contact_number": "555-0100",
        "payment_mode": mode,
    })
}

#[actix_web::test]
async fn checkout_without_identity_headers_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let req = TestRequest::post().uri("/checkout").set_json(checkout_body("OnlineCard"));
    let (status, _) = post_checkout(db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn online_checkout_returns_the_payment_intent() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "shopper", false).await;
    let product = seed_product(&db, "Clock", Cents::from_major(80), 3).await;
    add_cart_item(&db, user_id, product.id, 2).await;

    let mut gateway = MockGateway::new();
    gateway
        .expect_create_intent()
        .withf(move |req| req.user_id == user_id && req.amount == Cents::from_major(160))
        .once()
        .returning(|_| {
            Ok(PaymentIntent { reference: "pay_mock_1".to_string(), client_key: "rzp_test_key".to_string() })
        });

    let req = as_user(TestRequest::post().uri("/checkout"), user_id).set_json(checkout_body("OnlineCard"));
    let (status, body) = post_checkout(db, gateway, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "Payment Initiated");
    assert_eq!(body["order"]["transaction_id"], "pay_mock_1");
    assert_eq!(body["payment"]["reference"], "pay_mock_1");
    assert_eq!(body["payment"]["gateway_key"], "rzp_test_key");
    assert_eq!(body["payment"]["amount"], 16000);
    assert_eq!(body["payment"]["customer_name"], "shopper");
    assert_eq!(body["payment"]["customer_email"], "shopper@example.com");
    assert_eq!(body["payment"]["customer_contact"], "555-0100");
}

#[actix_web::test]
async fn cod_checkout_confirms_without_touching_the_gateway() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "cod_shopper", false).await;
    let product = seed_product(&db, "Radio", Cents::from_major(45), 2).await;
    add_cart_item(&db, user_id, product.id, 1).await;

    // No expectations: any gateway call panics the mock.
    let gateway = MockGateway::new();
    let req = as_user(TestRequest::post().uri("/checkout"), user_id).set_json(checkout_body("CashOnDelivery"));
    let (status, body) = post_checkout(db, gateway, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "Confirmed");
    assert_eq!(body["order"]["transaction_id"], serde_json::Value::Null);
    assert_eq!(body["payment"], serde_json::Value::Null);
}

#[actix_web::test]
async fn gateway_outage_maps_to_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "unlucky", false).await;
    let product = seed_product(&db, "Fan", Cents::from_major(30), 2).await;
    add_cart_item(&db, user_id, product.id, 1).await;

    let mut gateway = MockGateway::new();
    gateway
        .expect_create_intent()
        .once()
        .returning(|_| Err(GatewayError::Unavailable("connection refused".to_string())));

    let req = as_user(TestRequest::post().uri("/checkout"), user_id).set_json(checkout_body("OnlineCard"));
    let (status, body) = post_checkout(db, gateway, req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}

#[actix_web::test]
async fn empty_cart_checkout_is_a_client_error() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "empty_handed", false).await;
    let req = as_user(TestRequest::post().uri("/checkout"), user_id).set_json(checkout_body("CashOnDelivery"));
    let (status, body) = post_checkout(db, MockGateway::new(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("cart is empty"));
}
