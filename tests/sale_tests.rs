mod common;

use common::{dec, product_payload, test_state};
use integre_core::common::error::AppError;
use integre_core::models::client::ClientPayload;
use integre_core::models::sale::{NewSalePayload, PaymentMethod};

fn sale_payload(product_id: i64, quantity: i64, unit_price: &str) -> NewSalePayload {
    NewSalePayload {
        product_id,
        quantity,
        unit_price: dec(unit_price),
        client_id: None,
        payment_method: PaymentMethod::Cash,
        tendered: None,
    }
}

#[tokio::test]
async fn venda_baixa_estoque_e_calcula_total() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    let receipt = state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 3, "10.00"))
        .await
        .unwrap();

    assert_eq!(receipt.total, dec("30.00"));
    assert_eq!(receipt.sale.quantity, 3);
    assert_eq!(receipt.sale.unit_price, dec("10.00"));
    assert!(receipt.change.is_none());

    let wine = state.product_service.get_product(wine.id).await.unwrap();
    assert_eq!(wine.quantity, 2);
}

#[tokio::test]
async fn estoque_insuficiente_nao_grava_nada() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 2, "10.00"))
        .await
        .unwrap();

    let err = state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 5, "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { available: 2 }));

    // Estoque intacto e nenhuma linha de venda pendurada.
    let wine = state.product_service.get_product(wine.id).await.unwrap();
    assert_eq!(wine.quantity, 2);
    assert!(state.sale_service.recent_sales(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn estoque_nunca_fica_negativo() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 7, "10.00"))
        .await
        .unwrap();

    // Vende de 3 em 3 até acabar: 7 -> 4 -> 1 -> insuficiente.
    for _ in 0..2 {
        state
            .sale_service
            .record_sale(None, &sale_payload(wine.id, 3, "10.00"))
            .await
            .unwrap();
    }
    let err = state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 3, "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { available: 1 }));

    let wine = state.product_service.get_product(wine.id).await.unwrap();
    assert_eq!(wine.quantity, 1);
}

#[tokio::test]
async fn quantidade_invalida_e_rejeitada() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    for quantity in [0, -1] {
        let err = state
            .sale_service
            .record_sale(None, &sale_payload(wine.id, quantity, "10.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    let wine = state.product_service.get_product(wine.id).await.unwrap();
    assert_eq!(wine.quantity, 5);
}

#[tokio::test]
async fn produto_inexistente_e_reportado() {
    let state = test_state().await;
    let err = state
        .sale_service
        .record_sale(None, &sale_payload(999, 1, "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductNotFound));
}

#[tokio::test]
async fn troco_calculado_sobre_o_valor_entregue() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    let mut payload = sale_payload(wine.id, 3, "10.00");
    payload.tendered = Some(dec("50.00"));

    let receipt = state.sale_service.record_sale(None, &payload).await.unwrap();
    assert_eq!(receipt.total, dec("30.00"));
    assert_eq!(receipt.change, Some(dec("20.00")));
}

#[tokio::test]
async fn valor_entregue_insuficiente_e_rejeitado_antes_de_gravar() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    let mut payload = sale_payload(wine.id, 3, "10.00");
    payload.tendered = Some(dec("20.00"));

    let err = state
        .sale_service
        .record_sale(None, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let wine = state.product_service.get_product(wine.id).await.unwrap();
    assert_eq!(wine.quantity, 5);
    assert!(state.sale_service.recent_sales(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn total_da_venda_e_exato_sem_deriva_de_ponto_flutuante() {
    let state = test_state().await;
    let whey = state
        .product_service
        .create_product(None, &product_payload("Whey Protein", 30, "129.90"))
        .await
        .unwrap();

    let receipt = state
        .sale_service
        .record_sale(None, &sale_payload(whey.id, 3, "129.90"))
        .await
        .unwrap();
    assert_eq!(receipt.total, dec("389.70"));

    // Relendo a linha persistida: total idêntico ao calculado.
    let stored = state
        .sale_service
        .find_by_id(receipt.sale.id)
        .await
        .unwrap();
    assert_eq!(stored.total, dec("389.70"));
    assert_eq!(stored.unit_price, dec("129.90"));
}

#[tokio::test]
async fn preco_negativo_e_rejeitado() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    let err = state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 1, "-1.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn forma_de_pagamento_persiste_como_gravada() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();

    let mut payload = sale_payload(wine.id, 1, "10.00");
    payload.payment_method = PaymentMethod::Pix;

    let receipt = state.sale_service.record_sale(None, &payload).await.unwrap();
    let stored = state
        .sale_service
        .find_by_id(receipt.sale.id)
        .await
        .unwrap();
    assert_eq!(stored.payment_method, PaymentMethod::Pix);
}

#[tokio::test]
async fn excluir_cliente_anula_referencia_nas_vendas() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();
    let client = state
        .client_service
        .create_client(
            None,
            &ClientPayload {
                name: "João Silva".to_string(),
                tax_id: Some("123.456.789-00".to_string()),
                email: Some("joao@email.com".to_string()),
                phone: None,
                address: None,
            },
        )
        .await
        .unwrap();

    let mut payload = sale_payload(wine.id, 1, "10.00");
    payload.client_id = Some(client.id);
    let receipt = state.sale_service.record_sale(None, &payload).await.unwrap();
    assert_eq!(receipt.sale.client_id, Some(client.id));

    let by_client = state
        .sale_service
        .sales_by_client(client.id)
        .await
        .unwrap();
    assert_eq!(by_client.len(), 1);

    state
        .client_service
        .delete_client(None, client.id)
        .await
        .unwrap();

    // A venda sobrevive, sem referência ao cliente.
    let stored = state
        .sale_service
        .find_by_id(receipt.sale.id)
        .await
        .unwrap();
    assert_eq!(stored.client_id, None);
}

#[tokio::test]
async fn produto_com_vendas_nao_pode_ser_excluido() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 1, "10.00"))
        .await
        .unwrap();

    let err = state
        .product_service
        .delete_product(None, wine.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductHasSales));

    // O produto continua lá.
    assert!(state.product_service.get_product(wine.id).await.is_ok());
}

#[tokio::test]
async fn vendas_recentes_trazem_o_nome_do_produto() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 2, "10.00"))
        .await
        .unwrap();

    let recent = state.sale_service.recent_sales(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].product_name, "Vinho Tinto");
    assert_eq!(recent[0].total, dec("20.00"));
}

#[tokio::test]
async fn venda_gera_registro_de_auditoria_com_o_autor() {
    let state = test_state().await;
    state
        .auth_service
        .register(&common::register_payload(
            "joao.silva",
            "joao@email.com",
            "Secret1!",
        ))
        .await
        .unwrap();
    let operator = state
        .auth_service
        .authenticate("joao.silva", "Secret1!")
        .await
        .unwrap();

    let wine = state
        .product_service
        .create_product(Some(&operator), &product_payload("Vinho Tinto", 5, "10.00"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(Some(&operator), &sale_payload(wine.id, 1, "10.00"))
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_log WHERE table_name = 'sales' AND user_id = ?",
    )
    .bind(operator.id)
    .fetch_one(&state.db_pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}
