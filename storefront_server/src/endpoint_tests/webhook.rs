//! Tests for the webhook endpoint's response-code matrix and its refusal to mutate state on bad input.

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::json;
use sf_common::Cents;
use storefront_engine::{
    db_types::{OrderStatusType, PaymentMode, Principal},
    order_objects::NewCheckout,
    test_utils::{
        gateway::TestGateway,
        seed::{add_cart_item, seed_product, seed_user},
    },
    traits::OrderManagement,
    OrderFlowApi,
    SqliteDatabase,
};

use super::helpers::{gateway_config, new_test_db};
use crate::{
    data_objects::JsonResponse,
    helpers::calculate_hmac,
    webhook_routes::{PaymentWebhookRoute, SIGNATURE_HEADER},
};

const SECRET: &str = "whsec_test_4f1d";

/// Seeds a user with one initiated online order and returns (db, user_id, order_id). The gateway reference on the
/// order is `pay_wh_1`.
async fn store_with_initiated_order() -> (SqliteDatabase, i64, i64) {
    let db = new_test_db().await;
    let user_id = seed_user(&db, "webhook_shopper", false).await;
    let product = seed_product(&db, "Lamp", Cents::from_major(150), 5).await;
    add_cart_item(&db, user_id, product.id, 2).await;
    let api = OrderFlowApi::new(db.clone(), TestGateway::succeeding("pay_wh_1"));
    let checkout = NewCheckout {
        user_id,
        delivery_address: "12 Main Road".to_string(),
        contact_number: "555-0100".to_string(),
        payment_mode: PaymentMode::OnlineCard,
        currency: "INR".to_string(),
    };
    let outcome = api.checkout(&Principal::customer(user_id), checkout).await.expect("checkout failed");
    (db, user_id, outcome.order.id)
}

fn captured_event(order_id: i64, user_id: i64, reference: &str) -> String {
    json!({
        "event": "payment.captured",
        "payload": { "payment": { "entity": {
            "id": "pay_entity_1",
            "order_id": reference,
            "notes": { "internal_order_id": order_id, "user_id": user_id }
        }}}
    })
    .to_string()
}

async fn post_webhook(db: SqliteDatabase, secret: &str, body: String, signature: Option<String>) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OrderFlowApi::new(db, TestGateway::succeeding("unused"))))
            .app_data(web::Data::new(gateway_config(secret)))
            .service(PaymentWebhookRoute::<SqliteDatabase, TestGateway>::new()),
    )
    .await;
    let mut req = TestRequest::post().uri("/webhook/payment").set_payload(body);
    if let Some(sig) = signature {
        req = req.insert_header((SIGNATURE_HEADER, sig));
    }
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

async fn order_status(db: &SqliteDatabase, order_id: i64) -> OrderStatusType {
    db.fetch_order(order_id).await.unwrap().expect("order missing").status
}

#[actix_web::test]
async fn missing_signature_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (db, user_id, order_id) = store_with_initiated_order().await;
    let body = captured_event(order_id, user_id, "pay_wh_1");
    let (status, _) = post_webhook(db.clone(), SECRET, body, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::PaymentInitiated);
}

#[actix_web::test]
async fn tampered_payload_is_rejected_without_mutation() {
    let _ = env_logger::try_init().ok();
    let (db, user_id, order_id) = store_with_initiated_order().await;
    let body = captured_event(order_id, user_id, "pay_wh_1");
    // Sign the genuine body, then tamper with it in flight.
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let tampered = body.replace("payment.captured", "payment.failed");
    let (status, _) = post_webhook(db.clone(), SECRET, tampered, Some(signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::PaymentInitiated);
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let body = "this is not json".to_string();
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, _) = post_webhook(db, SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_webhook_secret_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let body = r#"{"event":"payment.captured"}"#.to_string();
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, _) = post_webhook(db, "", body, Some(signature)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn unhandled_event_type_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let body = json!({
        "event": "refund.created",
        "payload": { "payment": { "entity": { "id": "pay_x" }}}
    })
    .to_string();
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, body) = post_webhook(db, SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&body).unwrap();
    assert!(response.success);
}

#[actix_web::test]
async fn incomplete_metadata_is_acknowledged_without_action() {
    let _ = env_logger::try_init().ok();
    let (db, _user_id, order_id) = store_with_initiated_order().await;
    let body = json!({
        "event": "payment.captured",
        "payload": { "payment": { "entity": { "id": "pay_entity_1", "order_id": "pay_wh_1" }}}
    })
    .to_string();
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, _) = post_webhook(db.clone(), SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::PaymentInitiated);
}

#[actix_web::test]
async fn captured_event_confirms_the_order() {
    let _ = env_logger::try_init().ok();
    let (db, user_id, order_id) = store_with_initiated_order().await;
    let body = captured_event(order_id, user_id, "pay_wh_1");
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, _) = post_webhook(db.clone(), SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::Confirmed);
}

#[actix_web::test]
async fn duplicate_delivery_is_acknowledged_as_processed() {
    let _ = env_logger::try_init().ok();
    let (db, user_id, order_id) = store_with_initiated_order().await;
    let body = captured_event(order_id, user_id, "pay_wh_1");
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, _) = post_webhook(db.clone(), SECRET, body.clone(), Some(signature.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, response) = post_webhook(db.clone(), SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&response).unwrap();
    assert_eq!(response.message, "Event already processed");
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::Confirmed);
}

#[actix_web::test]
async fn mismatched_reference_is_acknowledged_but_not_applied() {
    let _ = env_logger::try_init().ok();
    let (db, user_id, order_id) = store_with_initiated_order().await;
    let body = captured_event(order_id, user_id, "pay_someone_else");
    let signature = calculate_hmac(SECRET, body.as_bytes());
    let (status, response) = post_webhook(db.clone(), SECRET, body, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);
    let response: JsonResponse = serde_json::from_str(&response).unwrap();
    assert_eq!(response.message, "Event does not match any order");
    assert_eq!(order_status(&db, order_id).await, OrderStatusType::PaymentInitiated);
}
