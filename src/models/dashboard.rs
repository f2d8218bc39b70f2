// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

// Cartões de resumo exibidos no topo do dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub sales_today: Decimal,
    pub total_products: i64,
    pub total_clients: i64,
    pub low_stock: i64,
}

// Um ponto da série "vendas por dia".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChartEntry {
    pub date: String,
    pub total: Decimal,
}

// Distribuição de produtos por categoria.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

// Item da lista "atividade recente".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityEntry {
    pub occurred_at: DateTime<Utc>,
    pub description: String,
}
