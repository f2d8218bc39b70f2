mod common;

use common::{dec, product_payload, test_state};
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
async fn resumo_do_dashboard_reflete_o_dia() {
    let state = test_state().await;

    let mut bebida = product_payload("Vinho Tinto", 50, "89.90");
    bebida.category = Some("Bebidas".to_string());
    let bebida = state
        .product_service
        .create_product(None, &bebida)
        .await
        .unwrap();

    let mut suplemento = product_payload("Whey Protein", 2, "129.90");
    suplemento.category = Some("Suplementos".to_string());
    state
        .product_service
        .create_product(None, &suplemento)
        .await
        .unwrap();

    state
        .client_service
        .create_client(
            None,
            &integre_core::models::client::ClientPayload {
                name: "João Silva".to_string(),
                tax_id: None,
                email: None,
                phone: None,
                address: None,
            },
        )
        .await
        .unwrap();

    // Duas vendas hoje: 2x 89.90 + 1x 89.90 = 269.70, somados como decimal.
    state
        .sale_service
        .record_sale(None, &sale_payload(bebida.id, 2, "89.90"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(None, &sale_payload(bebida.id, 1, "89.90"))
        .await
        .unwrap();

    let summary = state.dashboard_service.summary().await.unwrap();
    assert_eq!(summary.sales_today, dec("269.70"));
    assert_eq!(summary.total_products, 2);
    assert_eq!(summary.total_clients, 1);
    // Só o Whey (quantidade 2) está no limite de estoque baixo (<= 5).
    assert_eq!(summary.low_stock, 1);
}

#[tokio::test]
async fn serie_de_vendas_por_dia_agrupa_os_totais() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 50, "10.00"))
        .await
        .unwrap();

    state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 1, "10.00"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 2, "10.00"))
        .await
        .unwrap();

    let series = state.dashboard_service.sales_last_days(7).await.unwrap();
    assert_eq!(series.len(), 1); // ambas as vendas caem no dia de hoje
    assert_eq!(series[0].total, dec("30.00"));
}

#[tokio::test]
async fn distribuicao_por_categoria_usa_rotulo_padrao() {
    let state = test_state().await;

    let mut bebida = product_payload("Vinho Tinto", 50, "89.90");
    bebida.category = Some("Bebidas".to_string());
    state
        .product_service
        .create_product(None, &bebida)
        .await
        .unwrap();
    state
        .product_service
        .create_product(None, &product_payload("Produto Avulso", 5, "9.90"))
        .await
        .unwrap();

    let distribution = state
        .dashboard_service
        .category_distribution()
        .await
        .unwrap();
    assert_eq!(distribution.len(), 2);
    assert!(distribution
        .iter()
        .any(|c| c.category == "Sem Categoria" && c.count == 1));
    assert!(distribution
        .iter()
        .any(|c| c.category == "Bebidas" && c.count == 1));
}

#[tokio::test]
async fn atividade_recente_descreve_as_ultimas_vendas() {
    let state = test_state().await;
    let wine = state
        .product_service
        .create_product(None, &product_payload("Vinho Tinto", 50, "89.90"))
        .await
        .unwrap();
    state
        .sale_service
        .record_sale(None, &sale_payload(wine.id, 2, "89.90"))
        .await
        .unwrap();

    let activity = state.dashboard_service.recent_activity(10).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert!(activity[0].description.contains("Vinho Tinto"));
    assert!(activity[0].description.contains("Qtd: 2"));
    assert!(activity[0].description.contains("179.80"));
}
