// src/services/product_service.rs

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AuditRepository, ProductRepository},
    models::auth::Identity,
    models::product::{PriceHistoryEntry, Product, ProductPayload},
};

/// Limite padrão do alerta de estoque baixo.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Janela padrão do relatório de validade.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    audit_repo: AuditRepository,
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(
        product_repo: ProductRepository,
        audit_repo: AuditRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            product_repo,
            audit_repo,
            pool,
        }
    }

    pub async fn create_product(
        &self,
        actor: Option<&Identity>,
        payload: &ProductPayload,
    ) -> Result<Product, AppError> {
        Self::validate_payload(payload)?;

        let product = self.product_repo.create(&self.pool, payload).await?;

        self.audit(
            actor.map(|a| a.id),
            "CREATE",
            "products",
            Some(product.id),
            None,
            Some(&json!({ "name": product.name, "quantity": product.quantity })),
        )
        .await;
        tracing::info!("Produto cadastrado: {}", product.name);
        Ok(product)
    }

    /// Atualiza um produto; mudanças de preço alimentam o histórico na
    /// mesma transação.
    pub async fn update_product(
        &self,
        actor: Option<&Identity>,
        id: i64,
        payload: &ProductPayload,
    ) -> Result<Product, AppError> {
        Self::validate_payload(payload)?;

        let mut tx = self.pool.begin().await?;

        let existing = self
            .product_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let updated = self.product_repo.update(&mut *tx, id, payload).await?;

        if existing.price != updated.price {
            self.product_repo
                .record_price_change(&mut *tx, id, updated.price)
                .await?;
        }

        tx.commit().await?;

        self.audit(
            actor.map(|a| a.id),
            "UPDATE",
            "products",
            Some(id),
            Some(&json!({ "name": existing.name, "price": existing.price })),
            Some(&json!({ "name": updated.name, "price": updated.price })),
        )
        .await;
        tracing::info!("Produto atualizado: {} (ID: {})", updated.name, id);
        Ok(updated)
    }

    pub async fn delete_product(&self, actor: Option<&Identity>, id: i64) -> Result<(), AppError> {
        let existing = self
            .product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.product_repo.delete(&self.pool, id).await?;

        self.audit(
            actor.map(|a| a.id),
            "DELETE",
            "products",
            Some(id),
            Some(&json!({ "name": existing.name })),
            None,
        )
        .await;
        tracing::info!("Produto excluído: {} (ID: {})", existing.name, id);
        Ok(())
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.get_all().await
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, AppError> {
        self.product_repo.search_by_name(name).await
    }

    pub async fn low_stock(&self, threshold: Option<i64>) -> Result<Vec<Product>, AppError> {
        self.product_repo
            .low_stock(threshold.unwrap_or(LOW_STOCK_THRESHOLD))
            .await
    }

    pub async fn expiring_soon(&self, days: Option<i64>) -> Result<Vec<Product>, AppError> {
        self.product_repo
            .expiring_until(days.unwrap_or(EXPIRY_WINDOW_DAYS))
            .await
    }

    pub async fn price_history(&self, product_id: i64) -> Result<Vec<PriceHistoryEntry>, AppError> {
        self.product_repo.price_history(product_id).await
    }

    fn validate_payload(payload: &ProductPayload) -> Result<(), AppError> {
        payload.validate()?;
        if payload.price < Decimal::ZERO {
            return Err(AppError::Validation(
                "Preço não pode ser negativo.".to_string(),
            ));
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
