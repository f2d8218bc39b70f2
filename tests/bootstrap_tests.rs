// Abertura do banco em arquivo: criação na primeira execução e
// persistência entre aberturas, como no fluxo real do aplicativo.

mod common;

use common::register_payload;
use integre_core::config::AppState;

#[tokio::test]
async fn banco_em_arquivo_e_criado_e_persiste_entre_aberturas() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("integre_plus.db");
    let database_url = format!("sqlite://{}", db_path.display());

    {
        let pool = AppState::connect(&database_url).await.unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        let state = AppState::from_pool(pool);

        assert!(state.auth_service.ensure_default_admin().await.unwrap());
        state
            .auth_service
            .register(&register_payload("alice", "alice@email.com", "Secret1!"))
            .await
            .unwrap();

        state.db_pool.close().await;
    }

    assert!(db_path.exists());

    // Reabre o mesmo arquivo: migrações são idempotentes e os dados estão lá.
    let pool = AppState::connect(&database_url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    let state = AppState::from_pool(pool);

    assert!(!state.auth_service.ensure_default_admin().await.unwrap());
    state
        .auth_service
        .authenticate("alice", "Secret1!")
        .await
        .unwrap();

    state.db_pool.close().await;
}
