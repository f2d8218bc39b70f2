// Nem todo binário de teste usa todos os helpers.
#![allow(dead_code)]

use std::str::FromStr;

use integre_core::config::AppState;
use integre_core::models::auth::RegisterUserPayload;
use integre_core::models::product::ProductPayload;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Estado de teste sobre um banco em memória com o schema migrado.
/// Uma única conexão: todos os acessos enxergam o mesmo banco.
pub async fn test_state() -> AppState {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("URL de banco inválida")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("falha ao abrir o banco em memória");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("falha ao rodar as migrações");

    AppState::from_pool(pool)
}

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal inválido no teste")
}

pub fn register_payload(username: &str, email: &str, password: &str) -> RegisterUserPayload {
    RegisterUserPayload {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: None,
    }
}

pub fn product_payload(name: &str, quantity: i64, price: &str) -> ProductPayload {
    ProductPayload {
        name: name.to_string(),
        quantity,
        price: dec(price),
        expiry: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
        category: None,
        barcode: None,
        supplier_id: None,
    }
}
