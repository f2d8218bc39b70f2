// src/services/sale_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{AuditRepository, ProductRepository, SaleRepository},
    models::auth::Identity,
    models::sale::{NewSalePayload, Sale, SaleReceipt, SaleWithProduct},
};

#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    audit_repo: AuditRepository,
    pool: SqlitePool,
}

impl SaleService {
    pub fn new(
        sale_repo: SaleRepository,
        product_repo: ProductRepository,
        audit_repo: AuditRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            sale_repo,
            product_repo,
            audit_repo,
            pool,
        }
    }

    /// Registra uma venda: valida o saldo, insere a linha da venda e dá
    /// baixa no estoque DENTRO DA MESMA TRANSAÇÃO. Se qualquer passo
    /// falhar, nada é persistido: nem venda pendurada, nem estoque errado.
    ///
    /// Estoque insuficiente é um resultado esperado do negócio, não um
    /// erro excepcional: o caixa mostra a mensagem e segue.
    pub async fn record_sale(
        &self,
        actor: Option<&Identity>,
        payload: &NewSalePayload,
    ) -> Result<SaleReceipt, AppError> {
        if payload.quantity <= 0 {
            return Err(AppError::Validation(
                "A quantidade deve ser maior que zero.".to_string(),
            ));
        }
        if payload.unit_price < Decimal::ZERO {
            return Err(AppError::Validation(
                "Preço não pode ser negativo.".to_string(),
            ));
        }

        let total = Decimal::from(payload.quantity) * payload.unit_price;

        // Valor entregue insuficiente é rejeitado antes de qualquer escrita.
        if let Some(tendered) = payload.tendered {
            if tendered < total {
                return Err(AppError::Validation(format!(
                    "Valor entregue insuficiente. Total da venda: R$ {}.",
                    total
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        // 1. Lê o saldo atual dentro da transação
        let product = self
            .product_repo
            .find_by_id(&mut *tx, payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        // 2. Valida o saldo: o estoque nunca fica negativo
        if product.quantity < payload.quantity {
            return Err(AppError::InsufficientStock {
                available: product.quantity,
            });
        }

        // 3. Insere a venda com o preço capturado
        let sale = self
            .sale_repo
            .insert(
                &mut *tx,
                payload.product_id,
                payload.quantity,
                payload.unit_price,
                total,
                Utc::now(),
                payload.client_id,
                payload.payment_method,
            )
            .await?;

        // 4. Baixa no estoque
        self.product_repo
            .decrement_stock(&mut *tx, payload.product_id, payload.quantity)
            .await?;

        // 5. Se chegou aqui, deu tudo certo. "Commita" a transação.
        tx.commit().await?;

        self.audit(
            actor.map(|a| a.id),
            "CREATE",
            "sales",
            Some(sale.id),
            None,
            Some(&json!({
                "productId": sale.product_id,
                "quantity": sale.quantity,
                "total": sale.total,
            })),
        )
        .await;
        tracing::info!(
            "Venda registrada: produto {} x{} = R$ {}",
            sale.product_id,
            sale.quantity,
            sale.total
        );

        let change = payload.tendered.map(|tendered| tendered - total);
        Ok(SaleReceipt { sale, total, change })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Sale, AppError> {
        self.sale_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::SaleNotFound)
    }

    pub async fn recent_sales(&self, limit: i64) -> Result<Vec<SaleWithProduct>, AppError> {
        self.sale_repo.recent_sales(limit).await
    }

    pub async fn sales_by_client(&self, client_id: i64) -> Result<Vec<Sale>, AppError> {
        self.sale_repo.sales_by_client(client_id).await
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
