use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Tudo que a interface mostra ao usuário passa por `user_message()`;
// detalhes internos (sqlx, bcrypt) ficam só nos logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    Validation(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Venda não encontrada")]
    SaleNotFound,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta bloqueada")]
    AccountLocked,

    // Distinto de AccountLocked: o bloqueio aconteceu NESTA tentativa.
    #[error("Conta bloqueada após exceder o limite de tentativas")]
    AccountLockedNow,

    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: i64 },

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("CPF já cadastrado")]
    TaxIdAlreadyExists,

    #[error("Código de barras já cadastrado")]
    BarcodeAlreadyExists,

    #[error("Produto possui vendas registradas")]
    ProductHasSales,

    #[error("Token de redefinição inválido ou expirado")]
    InvalidResetToken,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Mensagem curta e localizada para a camada de apresentação.
    /// Erros inesperados viram um texto genérico; o detalhe vai para o log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::ValidationError(errors) => {
                let detalhes: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(_, field_errors)| {
                        field_errors
                            .iter()
                            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                if detalhes.is_empty() {
                    "Um ou mais campos são inválidos.".to_string()
                } else {
                    detalhes.join(" ")
                }
            }
            AppError::UserNotFound => "Usuário não encontrado.".to_string(),
            AppError::ProductNotFound => "Produto não encontrado.".to_string(),
            AppError::ClientNotFound => "Cliente não encontrado.".to_string(),
            AppError::SaleNotFound => "Venda não encontrada.".to_string(),
            AppError::InvalidCredentials => "Usuário ou senha incorretos.".to_string(),
            AppError::AccountLocked => {
                "Conta bloqueada. Procure um administrador para desbloquear.".to_string()
            }
            AppError::AccountLockedNow => {
                "Conta bloqueada após 3 tentativas de login sem sucesso.".to_string()
            }
            AppError::InsufficientStock { available } => {
                format!("Estoque insuficiente. Disponível: {}.", available)
            }
            AppError::UsernameAlreadyExists => {
                "Usuário já existe. Escolha outro nome de usuário.".to_string()
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::TaxIdAlreadyExists => "Este CPF já está cadastrado.".to_string(),
            AppError::BarcodeAlreadyExists => {
                "Este código de barras já está cadastrado.".to_string()
            }
            AppError::ProductHasSales => {
                "O produto não pode ser excluído: existem vendas registradas.".to_string()
            }
            AppError::InvalidResetToken => {
                "Token de redefinição inválido ou expirado.".to_string()
            }

            // Todos os outros (DatabaseError, BcryptError, InternalServerError)
            // não expõem texto bruto ao usuário. O `tracing` loga o detalhe.
            ref e => {
                tracing::error!("Erro interno: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        }
    }
}
