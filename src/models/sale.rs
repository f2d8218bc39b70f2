// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::common::db_utils::decimal_column;

// Formas de pagamento aceitas no caixa. Gravado como TEXT no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
}

// Uma venda concluída. Imutável depois de criada: o preço unitário é o
// preço praticado NO MOMENTO da venda, nunca rederivado do produto.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub client_id: Option<i64>,
    pub payment_method: PaymentMethod,
}

impl<'r> FromRow<'r, SqliteRow> for Sale {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            unit_price: decimal_column(row, "unit_price")?,
            total: decimal_column(row, "total")?,
            occurred_at: row.try_get("occurred_at")?,
            client_id: row.try_get("client_id")?,
            payment_method: row.try_get("payment_method")?,
        })
    }
}

// Dados para registrar uma venda
#[derive(Debug, Clone, Deserialize)]
pub struct NewSalePayload {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub client_id: Option<i64>,
    pub payment_method: PaymentMethod,
    /// Valor entregue pelo cliente (opcional; usado para calcular o troco).
    pub tendered: Option<Decimal>,
}

// Resultado devolvido ao caixa após uma venda concluída.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale: Sale,
    pub total: Decimal,
    /// Troco devido, quando o caixa informou o valor entregue.
    pub change: Option<Decimal>,
}

// Venda recente com o nome do produto, para histórico e dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithProduct {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

impl<'r> FromRow<'r, SqliteRow> for SaleWithProduct {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            unit_price: decimal_column(row, "unit_price")?,
            total: decimal_column(row, "total")?,
            occurred_at: row.try_get("occurred_at")?,
            payment_method: row.try_get("payment_method")?,
        })
    }
}
