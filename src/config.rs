// src/config.rs

use std::{env, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    db::{
        AuditRepository, ClientRepository, DashboardRepository, ProductRepository, SaleRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, client_service::ClientService, dashboard_service::DashboardService,
        product_service::ProductService, sale_service::SaleService,
    },
};

// Banco padrão quando DATABASE_URL não está definida: um arquivo local
// único ao lado do executável, criado na primeira execução.
const DEFAULT_DATABASE_URL: &str = "sqlite://integre_plus.db";

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub client_service: ClientService,
    pub sale_service: SaleService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let db_pool = Self::connect(&database_url).await?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;
        Ok(db_pool)
    }

    /// Monta os repositórios e serviços sobre uma pool já aberta.
    /// Também é o ponto de entrada dos testes de integração.
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo, audit_repo.clone(), db_pool.clone());
        let product_service =
            ProductService::new(product_repo.clone(), audit_repo.clone(), db_pool.clone());
        let client_service =
            ClientService::new(client_repo, audit_repo.clone(), db_pool.clone());
        let sale_service =
            SaleService::new(sale_repo, product_repo, audit_repo, db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo);

        Self {
            db_pool,
            auth_service,
            product_service,
            client_service,
            sale_service,
            dashboard_service,
        }
    }
}
