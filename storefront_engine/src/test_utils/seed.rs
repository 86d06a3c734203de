//! Seed data helpers for integration tests. These write directly to the database, bypassing the public API, so
//! tests can set up fixtures without depending on the code under test.

use sf_common::Cents;

use crate::{db_types::Product, SqliteDatabase};

pub async fn seed_user(db: &SqliteDatabase, username: &str, is_admin: bool) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        r#"
            INSERT INTO users (username, email, password_hash, address, contact_number, is_admin)
            VALUES ($1, $2, 'x', '12 Main Road', '555-0100', $3)
            RETURNING id;
        "#,
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(is_admin)
    .fetch_one(db.pool())
    .await
    .expect("Error seeding user");
    id
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price: Cents, stock: i64) -> Product {
    sqlx::query_as(
        r#"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(name)
    .bind(format!("A very fine {name}"))
    .bind(price)
    .bind(stock)
    .fetch_one(db.pool())
    .await
    .expect("Error seeding product")
}

pub async fn add_cart_item(db: &SqliteDatabase, user_id: i64, product_id: i64, quantity: i64) {
    sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(db.pool())
        .await
        .expect("Error seeding cart item");
}
