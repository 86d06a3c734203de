use std::time::Duration;

use log::*;
use sf_common::Cents;
use storefront_engine::{
    db_types::{PaymentMode, Principal},
    order_objects::NewCheckout,
    test_utils::{
        gateway::TestGateway,
        prepare_env::{prepare_test_env, random_db_path},
        seed::{add_cart_item, seed_product, seed_user},
    },
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};
use tokio::runtime::Runtime;

const NUM_SHOPPERS: u64 = 20;
const UNITS_IN_STOCK: i64 = 12;
const RATE: u64 = 100; // checkouts per second

#[test]
fn burst_checkouts() {
    info!("🚀️ Starting checkout burst test");

    let sys = Runtime::new().unwrap();

    let delay = Duration::from_millis(1000 / RATE);

    sys.block_on(async move {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
        let api = OrderFlowApi::new(db.clone(), TestGateway::succeeding("unused"));
        let catalog = CatalogApi::new(db.clone());

        let hot_item = seed_product(&db, "Limited Edition Teapot", Cents::from_major(500), UNITS_IN_STOCK).await;
        let mut shoppers = Vec::new();
        for i in 0..NUM_SHOPPERS {
            let user_id = seed_user(&db, &format!("shopper_{i}"), false).await;
            add_cart_item(&db, user_id, hot_item.id, 1).await;
            shoppers.push(user_id);
        }

        let mut timer = tokio::time::interval(delay);
        info!("🚀️ Injecting {NUM_SHOPPERS} checkouts for {UNITS_IN_STOCK} units");
        let mut confirmed = 0i64;
        for user_id in shoppers {
            timer.tick().await;
            let checkout = NewCheckout {
                user_id,
                delivery_address: "12 Main Road".to_string(),
                contact_number: "555-0100".to_string(),
                payment_mode: PaymentMode::CashOnDelivery,
                currency: "INR".to_string(),
            };
            match api.checkout(&Principal::customer(user_id), checkout).await {
                Ok(_) => confirmed += 1,
                Err(e) => debug!("Checkout for user {user_id} did not go through: {e}"),
            }
        }

        assert_eq!(confirmed, UNITS_IN_STOCK, "every unit in stock sells exactly once");
        let remaining = catalog.fetch_product(hot_item.id).await.unwrap().stock;
        assert_eq!(remaining, 0);
    });
    info!("🚀️ test complete");
}
