// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{CategoryCount, DashboardSummary, RecentActivityEntry, SalesChartEntry},
    services::product_service::LOW_STOCK_THRESHOLD,
};

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository) -> Self {
        Self { dashboard_repo }
    }

    /// Cartões de resumo: vendas de hoje, totais e alerta de estoque.
    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let sales_today = self.dashboard_repo.sales_total_today().await?;
        let total_products = self.dashboard_repo.product_count().await?;
        let total_clients = self.dashboard_repo.client_count().await?;
        let low_stock = self
            .dashboard_repo
            .low_stock_count(LOW_STOCK_THRESHOLD)
            .await?;

        Ok(DashboardSummary {
            sales_today,
            total_products,
            total_clients,
            low_stock,
        })
    }

    /// Série para o gráfico "vendas dos últimos N dias".
    pub async fn sales_last_days(&self, days: i64) -> Result<Vec<SalesChartEntry>, AppError> {
        self.dashboard_repo.sales_by_day(days).await
    }

    pub async fn category_distribution(&self) -> Result<Vec<CategoryCount>, AppError> {
        self.dashboard_repo.category_distribution().await
    }

    pub async fn recent_activity(&self, limit: i64) -> Result<Vec<RecentActivityEntry>, AppError> {
        self.dashboard_repo.recent_activity(limit).await
    }
}
