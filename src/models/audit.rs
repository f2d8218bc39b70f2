// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

// Entrada do livro de auditoria. Gravação em melhor esforço: uma falha
// aqui nunca aborta a operação principal.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i64>,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
