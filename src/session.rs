// src/session.rs

use chrono::{DateTime, Utc};

use crate::models::auth::{Identity, Role};

/// Sessão do usuário autenticado, criada pela interface após o login.
///
/// Substitui as antigas variáveis globais de "usuário logado": a
/// identidade circula explicitamente por quem precisa dela, e morre com
/// a sessão. No máximo uma sessão ativa por instância do aplicativo.
#[derive(Debug, Clone)]
pub struct Session {
    identity: Identity,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            started_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> i64 {
        self.identity.id
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn is_admin(&self) -> bool {
        self.identity.role == Role::Admin
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
