// src/db/audit_repo.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{common::error::AppError, models::audit::AuditEntry};

// Livro de auditoria. O chamador (serviços) trata a gravação como melhor
// esforço; aqui só executamos o INSERT e devolvemos o erro cru.
#[derive(Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        user_id: Option<i64>,
        action: &str,
        table_name: &str,
        record_id: Option<i64>,
        old_data: Option<&serde_json::Value>,
        new_data: Option<&serde_json::Value>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (user_id, action, table_name, record_id, old_data, new_data, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(table_name)
        .bind(record_id)
        .bind(old_data.map(|v| v.to_string()))
        .bind(new_data.map(|v| v.to_string()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM audit_log ORDER BY occurred_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
