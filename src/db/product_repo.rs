// src/db/product_repo.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::product::{PriceHistoryEntry, Product, ProductPayload},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE name LIKE ? ORDER BY name ASC",
        )
        .bind(format!("%{}%", name))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Produtos com estoque abaixo do limite informado.
    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE quantity <= ? ORDER BY quantity ASC",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Produtos cuja validade vence dentro de `days` dias.
    pub async fn expiring_until(&self, days: i64) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE expiry <= DATE('now', ?) ORDER BY expiry ASC",
        )
        .bind(format!("+{} days", days))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn price_history(&self, product_id: i64) -> Result<Vec<PriceHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, PriceHistoryEntry>(
            "SELECT * FROM price_history WHERE product_id = ? ORDER BY changed_at DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---
    // Estas usam o padrão genérico 'Executor' para rodar dentro de uma transação.

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &ProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, quantity, price, expiry, category, barcode, supplier_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(payload.quantity)
        .bind(payload.price.to_string())
        .bind(payload.expiry)
        .bind(&payload.category)
        .bind(&payload.barcode)
        .bind(payload.supplier_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.message().contains("products.barcode") {
                    return AppError::BarcodeAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, quantity = ?, price = ?, expiry = ?, category = ?,
                barcode = ?, supplier_id = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(payload.quantity)
        .bind(payload.price.to_string())
        .bind(payload.expiry)
        .bind(&payload.category)
        .bind(&payload.barcode)
        .bind(payload.supplier_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.message().contains("products.barcode") {
                    return AppError::BarcodeAlreadyExists;
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::ProductNotFound)
    }

    /// Baixa de estoque de uma venda. O CHECK (quantity >= 0) do schema é a
    /// última linha de defesa; o serviço valida o saldo antes, na mesma
    /// transação.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: i64,
        quantity: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE products SET quantity = quantity - ?, updated_at = ? WHERE id = ?")
            .bind(quantity)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Registra uma mudança de preço no histórico.
    pub async fn record_price_change<'e, E>(
        &self,
        executor: E,
        product_id: i64,
        price: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO price_history (product_id, price, changed_at) VALUES (?, ?, ?)")
            .bind(product_id)
            .bind(price.to_string())
            .bind(Utc::now())
            .execute(executor)
            .await?;
        Ok(())
    }

    // A FK de vendas é ON DELETE RESTRICT: produto com venda não sai.
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProductHasSales;
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }
}
