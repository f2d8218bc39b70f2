use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

// ---
// Helpers de decodificação para colunas monetárias
// ---
// O SQLite não tem tipo decimal; preços e totais são gravados como TEXT
// canônico ("89.90") e convertidos para `Decimal` na leitura. Somas de
// dinheiro acontecem em Rust, nunca em SQL, para não introduzir float.

pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_decimal(column, &raw)
}

pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, sqlx::Error> {
    raw.parse::<Decimal>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
