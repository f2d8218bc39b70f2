// src/db/dashboard_repo.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use crate::{
    common::db_utils::parse_decimal,
    common::error::AppError,
    models::dashboard::{CategoryCount, RecentActivityEntry, SalesChartEntry},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // A. Vendas de Hoje
    // Totais são TEXT decimal; a soma acontece em Rust com `Decimal`,
    // nunca com SUM() do SQLite (que converteria para REAL).
    pub async fn sales_total_today(&self) -> Result<Decimal, AppError> {
        let totals: Vec<String> = sqlx::query_scalar(
            "SELECT total FROM sales WHERE DATE(occurred_at) = DATE('now')",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut sum = Decimal::ZERO;
        for raw in totals {
            sum += parse_decimal("total", &raw)?;
        }
        Ok(sum)
    }

    pub async fn product_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn client_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn low_stock_count(&self, threshold: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE quantity <= ?")
            .bind(threshold)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // B. Série "vendas por dia" dos últimos N dias
    pub async fn sales_by_day(&self, days: i64) -> Result<Vec<SalesChartEntry>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT DATE(occurred_at) AS day, total
            FROM sales
            WHERE occurred_at >= DATETIME('now', ?)
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(format!("-{} days", days))
        .fetch_all(&self.pool)
        .await?;

        // Agrupa por dia preservando a exatidão decimal.
        let mut per_day: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let day: String = row.try_get("day").map_err(AppError::DatabaseError)?;
            let raw: String = row.try_get("total").map_err(AppError::DatabaseError)?;
            let total = parse_decimal("total", &raw)?;
            *per_day.entry(day).or_insert(Decimal::ZERO) += total;
        }

        Ok(per_day
            .into_iter()
            .map(|(date, total)| SalesChartEntry { date, total })
            .collect())
    }

    // C. Distribuição de produtos por categoria
    pub async fn category_distribution(&self) -> Result<Vec<CategoryCount>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT COALESCE(category, 'Sem Categoria') AS category, COUNT(*) AS count
            FROM products
            GROUP BY category
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryCount {
                    category: row.try_get("category").map_err(AppError::DatabaseError)?,
                    count: row.try_get("count").map_err(AppError::DatabaseError)?,
                })
            })
            .collect()
    }

    // D. Atividade recente: últimas vendas com o nome do produto
    pub async fn recent_activity(&self, limit: i64) -> Result<Vec<RecentActivityEntry>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT s.occurred_at, p.name AS product_name, s.quantity, s.total
            FROM sales s
            JOIN products p ON s.product_id = p.id
            ORDER BY s.occurred_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let product_name: String =
                    row.try_get("product_name").map_err(AppError::DatabaseError)?;
                let quantity: i64 = row.try_get("quantity").map_err(AppError::DatabaseError)?;
                let raw_total: String = row.try_get("total").map_err(AppError::DatabaseError)?;
                let total = parse_decimal("total", &raw_total)?;
                Ok(RecentActivityEntry {
                    occurred_at: row.try_get("occurred_at").map_err(AppError::DatabaseError)?,
                    description: format!(
                        "Venda: {} (Qtd: {}) - R$ {}",
                        product_name, quantity, total
                    ),
                })
            })
            .collect()
    }
}
