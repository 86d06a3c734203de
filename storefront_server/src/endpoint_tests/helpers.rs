use std::time::Duration;

use actix_web::test::TestRequest;
use sf_common::Secret;
use storefront_engine::{
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    SqliteDatabase,
};

use crate::{
    auth::{ROLES_HEADER, USER_HEADER},
    config::RazorpayConfig,
};

/// Creates a fresh, fully migrated SQLite database for one test.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating test database")
}

pub fn gateway_config(webhook_secret: &str) -> RazorpayConfig {
    RazorpayConfig {
        api_key: "rzp_test_1DP5mmOlF5G5ag".to_string(),
        api_secret: Secret::new("do-not-log-me".to_string()),
        webhook_secret: Secret::new(webhook_secret.to_string()),
        base_url: "http://localhost:0".to_string(),
        timeout: Duration::from_secs(1),
    }
}

/// Attaches the trusted identity headers the session-terminating frontend would normally add.
pub fn as_user(req: TestRequest, user_id: i64) -> TestRequest {
    req.insert_header((USER_HEADER, user_id.to_string()))
}

pub fn as_admin(req: TestRequest, user_id: i64) -> TestRequest {
    req.insert_header((USER_HEADER, user_id.to_string())).insert_header((ROLES_HEADER, "customer,admin"))
}
