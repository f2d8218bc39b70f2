// src/db/client_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::client::{Client, ClientPayload},
};

#[derive(Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn get_all(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(clients)
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE name LIKE ? ORDER BY name ASC",
        )
        .bind(format!("%{}%", name))
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &ClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, tax_id, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.tax_id)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &ClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = ?, tax_id = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.tax_id)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_unique_violation)?
        .ok_or(AppError::ClientNotFound)
    }

    // As vendas do cliente ficam com client_id NULL (ON DELETE SET NULL).
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.message().contains("clients.tax_id") {
                return AppError::TaxIdAlreadyExists;
            }
            if db_err.message().contains("clients.email") {
                return AppError::EmailAlreadyExists;
            }
        }
    }
    e.into()
}
