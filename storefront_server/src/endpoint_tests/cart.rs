use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::json;
use sf_common::Cents;
use storefront_engine::{
    test_utils::seed::{seed_product, seed_user},
    CartApi,
    CatalogApi,
    SqliteDatabase,
};

use super::helpers::{as_admin, as_user, new_test_db};
use crate::routes::{AddToCartRoute, CreateProductRoute, MyCartRoute, UpdateCartItemRoute};

async fn call(db: SqliteDatabase, req: TestRequest) -> (StatusCode, serde_json::Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(CartApi::new(db.clone())))
            .app_data(web::Data::new(CatalogApi::new(db)))
            .service(MyCartRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartItemRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new()),
    )
    .await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: serde_json::Value = serde_json::from_slice(&test::read_body(res).await).unwrap_or(json!({}));
    (status, body)
}

#[actix_web::test]
async fn adding_to_cart_and_reading_it_back() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "carter", false).await;
    let product = seed_product(&db, "Notebook", Cents::from_major(5), 10).await;

    let req = as_user(TestRequest::post().uri("/cart"), user_id).set_json(json!({"product_id": product.id}));
    let (status, item) = call(db.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"], 1);

    let (status, cart) = call(db, as_user(TestRequest::get().uri("/cart"), user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["name"], "Notebook");
}

#[actix_web::test]
async fn quantity_updates_clamp_to_stock() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "greedy", false).await;
    let product = seed_product(&db, "Pencil", Cents::from_major(1), 4).await;

    let req = as_user(TestRequest::post().uri("/cart"), user_id).set_json(json!({"product_id": product.id}));
    let (_, item) = call(db.clone(), req).await;
    let cart_item_id = item["id"].as_i64().unwrap();

    let req = as_user(TestRequest::put().uri(&format!("/cart/{cart_item_id}")), user_id)
        .set_json(json!({"quantity": 99}));
    let (status, item) = call(db, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"], 4, "requests beyond stock clamp to the available units");
}

#[actix_web::test]
async fn setting_quantity_to_zero_removes_the_item() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "fickle", false).await;
    let product = seed_product(&db, "Eraser", Cents::from_major(1), 4).await;

    let req = as_user(TestRequest::post().uri("/cart"), user_id).set_json(json!({"product_id": product.id}));
    let (_, item) = call(db.clone(), req).await;
    let cart_item_id = item["id"].as_i64().unwrap();

    let req =
        as_user(TestRequest::put().uri(&format!("/cart/{cart_item_id}")), user_id).set_json(json!({"quantity": 0}));
    let (status, _) = call(db.clone(), req).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cart) = call(db, as_user(TestRequest::get().uri("/cart"), user_id)).await;
    assert!(cart.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn customers_cannot_create_products() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let user_id = seed_user(&db, "sneaky", false).await;
    let req = as_user(TestRequest::post().uri("/products"), user_id)
        .set_json(json!({"name": "Free stuff", "description": "", "price": 0, "stock": 1000}));
    let (status, _) = call(db, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admins_can_create_products() {
    let _ = env_logger::try_init().ok();
    let db = new_test_db().await;
    let admin_id = seed_user(&db, "boss", true).await;
    let req = as_admin(TestRequest::post().uri("/products"), admin_id)
        .set_json(json!({"name": "Stapler", "description": "Red", "price": 1299, "stock": 7}));
    let (status, product) = call(db, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Stapler");
    assert_eq!(product["stock"], 7);
}
