// src/services/client_service.rs

use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::validation::validar_email,
    db::{AuditRepository, ClientRepository},
    models::auth::Identity,
    models::client::{Client, ClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    client_repo: ClientRepository,
    audit_repo: AuditRepository,
    pool: SqlitePool,
}

impl ClientService {
    pub fn new(
        client_repo: ClientRepository,
        audit_repo: AuditRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            client_repo,
            audit_repo,
            pool,
        }
    }

    pub async fn create_client(
        &self,
        actor: Option<&Identity>,
        payload: &ClientPayload,
    ) -> Result<Client, AppError> {
        Self::validate_payload(payload)?;

        let client = self.client_repo.create(&self.pool, payload).await?;

        self.audit(
            actor.map(|a| a.id),
            "CREATE",
            "clients",
            Some(client.id),
            None,
            Some(&json!({ "name": client.name })),
        )
        .await;
        tracing::info!("Cliente cadastrado: {}", client.name);
        Ok(client)
    }

    pub async fn update_client(
        &self,
        actor: Option<&Identity>,
        id: i64,
        payload: &ClientPayload,
    ) -> Result<Client, AppError> {
        Self::validate_payload(payload)?;

        let existing = self
            .client_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let updated = self.client_repo.update(&self.pool, id, payload).await?;

        self.audit(
            actor.map(|a| a.id),
            "UPDATE",
            "clients",
            Some(id),
            Some(&json!({ "name": existing.name })),
            Some(&json!({ "name": updated.name })),
        )
        .await;
        Ok(updated)
    }

    /// Exclui o cliente. As vendas associadas permanecem, com a
    /// referência ao cliente anulada pelo próprio schema (SET NULL).
    pub async fn delete_client(&self, actor: Option<&Identity>, id: i64) -> Result<(), AppError> {
        let existing = self
            .client_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        self.client_repo.delete(&self.pool, id).await?;

        self.audit(
            actor.map(|a| a.id),
            "DELETE",
            "clients",
            Some(id),
            Some(&json!({ "name": existing.name })),
            None,
        )
        .await;
        tracing::info!("Cliente excluído: {} (ID: {})", existing.name, id);
        Ok(())
    }

    pub async fn get_client(&self, id: i64) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        self.client_repo.get_all().await
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Client>, AppError> {
        self.client_repo.search_by_name(name).await
    }

    fn validate_payload(payload: &ClientPayload) -> Result<(), AppError> {
        payload.validate()?;
        if let Some(email) = payload.email.as_deref() {
            validar_email(email)?;
        }
        Ok(())
    }

    async fn audit(
        &self,
        user_id: Option<i64>,
        action: &str,
        table: &str,
        record_id: Option<i64>,
        old_data: Option<&serde_json::Value>,
        new_data: Option<&serde_json::Value>,
    ) {
        if let Err(e) = self
            .audit_repo
            .append(user_id, action, table, record_id, old_data, new_data)
            .await
        {
            tracing::warn!("Falha ao gravar auditoria ({} em {}): {}", action, table, e);
        }
    }
}
