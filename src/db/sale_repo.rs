// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::sale::{PaymentMethod, Sale, SaleWithProduct},
};

#[derive(Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insere a linha da venda com o preço capturado e o total já
    /// calculado. Sempre chamado dentro da transação da venda.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        quantity: i64,
        unit_price: Decimal,
        total: Decimal,
        occurred_at: DateTime<Utc>,
        client_id: Option<i64>,
        payment_method: PaymentMethod,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (product_id, quantity, unit_price, total, occurred_at, client_id, payment_method)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price.to_string())
        .bind(total.to_string())
        .bind(occurred_at)
        .bind(client_id)
        .bind(payment_method)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    /// Últimas vendas com o nome do produto, para o histórico do caixa.
    pub async fn recent_sales(&self, limit: i64) -> Result<Vec<SaleWithProduct>, AppError> {
        let sales = sqlx::query_as::<_, SaleWithProduct>(
            r#"
            SELECT s.id, p.name AS product_name, s.quantity, s.unit_price,
                   s.total, s.occurred_at, s.payment_method
            FROM sales s
            JOIN products p ON s.product_id = p.id
            ORDER BY s.occurred_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn sales_by_client(&self, client_id: i64) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE client_id = ? ORDER BY occurred_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }
}
