//src/main.rs

use integre_core::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Cria o usuário admin padrão na primeira execução
    match app_state.auth_service.ensure_default_admin().await {
        Ok(true) => tracing::info!("Usuário admin padrão criado"),
        Ok(false) => {}
        Err(e) => tracing::error!("🔥 Falha ao criar o usuário admin padrão: {}", e),
    }

    tracing::info!("🚀 Núcleo Integre+ pronto. A interface pode conectar-se ao banco.");
}
