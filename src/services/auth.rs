// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::validation::{validar_email, validar_senha, validar_username},
    db::{AuditRepository, UserRepository},
    models::auth::{Identity, Role, User},
    models::auth::RegisterUserPayload,
};

/// Tentativas de login sem sucesso até a conta ser bloqueada.
pub const MAX_LOGIN_ATTEMPTS: i64 = 3;

/// Validade do token de redefinição de senha.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    audit_repo: AuditRepository,
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, audit_repo: AuditRepository, pool: SqlitePool) -> Self {
        Self {
            user_repo,
            audit_repo,
            pool,
        }
    }

    /// Verifica as credenciais e devolve o registro mínimo de identidade.
    ///
    /// Toda chamada que encontra a conta MUTA o estado persistido
    /// (contador, bloqueio, último login), inclusive nas falhas.
    /// Usuário inexistente não toca em nada: nenhum estado fantasma de
    /// bloqueio é criado.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Conta bloqueada falha antes de qualquer verificação de senha.
        if user.locked {
            tracing::warn!("Tentativa de login em conta bloqueada: {}", user.username);
            return Err(AppError::AccountLocked);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if is_password_valid {
            self.user_repo
                .record_login_success(&self.pool, user.id)
                .await?;
            self.audit(Some(user.id), "LOGIN", "users", Some(user.id), None, None)
                .await;
            tracing::info!("Login bem-sucedido: {}", user.username);
            return Ok(Identity::from(&user));
        }

        // Senha errada: incrementa o contador e bloqueia ao atingir o limite.
        let (attempts, locked_now) = self
            .user_repo
            .record_login_failure(&self.pool, user.id, MAX_LOGIN_ATTEMPTS)
            .await?;
        self.audit(
            Some(user.id),
            "LOGIN_FAILED",
            "users",
            Some(user.id),
            None,
            Some(&json!({ "failedAttempts": attempts })),
        )
        .await;
        tracing::warn!(
            "Falha de login para {} (tentativa {}/{})",
            user.username,
            attempts,
            MAX_LOGIN_ATTEMPTS
        );

        if locked_now {
            // O bloqueio aconteceu agora: o chamador precisa distinguir
            // este caso de uma senha errada comum.
            Err(AppError::AccountLockedNow)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Cadastra um novo usuário. Nenhuma persistência acontece se alguma
    /// política (usuário, e-mail, senha) for violada; a primeira violação
    /// de senha vence.
    pub async fn register(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        payload.validate()?;
        validar_username(&payload.username)?;
        validar_email(&payload.email)?;
        validar_senha(&payload.password)?;

        let hashed = Self::hash_password(payload.password.clone()).await?;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                payload.username.trim(),
                &hashed,
                Some(payload.email.as_str()),
                payload.role.unwrap_or(Role::Employee),
            )
            .await?;

        self.audit(
            Some(user.id),
            "CREATE",
            "users",
            Some(user.id),
            None,
            Some(&json!({ "username": user.username, "role": user.role })),
        )
        .await;
        tracing::info!("Usuário cadastrado: {}", user.username);
        Ok(user)
    }

    /// Troca de senha com verificação da senha atual.
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let current = current_password.to_owned();
        let stored = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || verify(&current, &stored))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        validar_senha(new_password)?;
        let hashed = Self::hash_password(new_password.to_owned()).await?;
        self.user_repo
            .update_password(&self.pool, user.id, &hashed)
            .await?;

        self.audit(Some(user.id), "UPDATE", "users", Some(user.id), None, None)
            .await;
        Ok(())
    }

    /// Gera um token opaco de redefinição com validade de 1 hora.
    /// O envio do token (e-mail etc.) fica a cargo da interface.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = Uuid::new_v4().to_string();
        let expiry = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.user_repo
            .set_reset_token(&self.pool, user.id, &token, expiry)
            .await?;
        Ok(token)
    }

    /// Redefine a senha a partir de um token válido e não expirado.
    /// Também desbloqueia a conta: redefinir vale como desbloqueio.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_reset_token(token)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        match user.reset_token_expiry {
            Some(expiry) if expiry > Utc::now() => {}
            _ => return Err(AppError::InvalidResetToken),
        }

        validar_senha(new_password)?;
        let hashed = Self::hash_password(new_password.to_owned()).await?;

        let mut tx = self.pool.begin().await?;
        self.user_repo
            .update_password(&mut *tx, user.id, &hashed)
            .await?;
        self.user_repo.clear_reset_token(&mut *tx, user.id).await?;
        tx.commit().await?;

        self.audit(
            Some(user.id),
            "PASSWORD_RESET",
            "users",
            Some(user.id),
            None,
            None,
        )
        .await;
        Ok(())
    }

    /// Desbloqueio explícito: limpa o sinalizador e zera o contador.
    pub async fn unlock_account(&self, actor: Option<&Identity>, user_id: i64) -> Result<(), AppError> {
        let affected = self.user_repo.unlock(&self.pool, user_id).await?;
        if affected == 0 {
            return Err(AppError::UserNotFound);
        }
        self.audit(
            actor.map(|a| a.id),
            "UNLOCK",
            "users",
            Some(user_id),
            None,
            None,
        )
        .await;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_users().await
    }

    /// Exclusão administrativa direta de um usuário.
    pub async fn delete_user(&self, actor: Option<&Identity>, user_id: i64) -> Result<(), AppError> {
        let affected = self.user_repo.delete_user(&self.pool, user_id).await?;
        if affected == 0 {
            return Err(AppError::UserNotFound);
        }
        self.audit(
            actor.map(|a| a.id),
            "DELETE",
            "users",
            Some(user_id),
            None,
            None,
        )
        .await;
        Ok(())
    }

    /// Cria o usuário 'admin' padrão na primeira execução, se não existir.
    /// Devolve true quando o usuário foi criado.
    pub async fn ensure_default_admin(&self) -> Result<bool, AppError> {
        if self.user_repo.find_by_username("admin").await?.is_some() {
            return Ok(false);
        }

        let hashed = Self::hash_password("admin123".to_owned()).await?;
        self.user_repo
            .create_user(
                &self.pool,
                "admin",
                &hashed,
                Some("admin@integre.com"),
                Role::Admin,
            )
            .await?;
        tracing::info!("Usuário admin padrão criado");
        Ok(true)
    }

    // Hashing em thread separado (bcrypt é intencionalmente lento).
    async fn hash_password(password: String) -> Result<String, AppError> {
        let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    // Auditoria em melhor esforço: loga e segue em frente.
    async fn audit(
        &self,
        user_id: Option<i64>,
        action: &str,
        table: &str,
        record_id: Option<i64>,
        old_data: Option<&serde_json::Value>,
        new_data: Option<&serde_json::Value>,
    ) {
        if let Err(e) = self
            .audit_repo
            .append(user_id, action, table, record_id, old_data, new_data)
            .await
        {
            tracing::warn!("Falha ao gravar auditoria ({} em {}): {}", action, table, e);
        }
    }
}
