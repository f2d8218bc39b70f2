// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use crate::common::db_utils::decimal_column;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub expiry: NaiveDate,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub supplier_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// FromRow manual: `price` é TEXT no SQLite e precisa virar Decimal.
impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
            price: decimal_column(row, "price")?,
            expiry: row.try_get("expiry")?,
            category: row.try_get("category")?,
            barcode: row.try_get("barcode")?,
            supplier_id: row.try_get("supplier_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

// Registro do histórico de preços de um produto.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub product_id: i64,
    pub price: Decimal,
    pub changed_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for PriceHistoryEntry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            price: decimal_column(row, "price")?,
            changed_at: row.try_get("changed_at")?,
        })
    }
}

// Dados para cadastro/atualização de produto
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Nome do produto é obrigatório."))]
    pub name: String,
    #[validate(range(min = 0, message = "Quantidade não pode ser negativa."))]
    pub quantity: i64,
    pub price: Decimal,
    pub expiry: NaiveDate,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub supplier_id: Option<i64>,
}
