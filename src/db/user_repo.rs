// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu nome de usuário
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE reset_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário no banco de dados
    // Com tradução do erro de chave única para o campo ofensor.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    // O SQLite nomeia a coluna na mensagem:
                    // "UNIQUE constraint failed: users.username"
                    if db_err.message().contains("users.username") {
                        return AppError::UsernameAlreadyExists;
                    }
                    if db_err.message().contains("users.email") {
                        return AppError::EmailAlreadyExists;
                    }
                }
            }
            e.into()
        })
    }

    /// Zera o contador de falhas e registra o horário do login.
    pub async fn record_login_success<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE users
            SET failed_attempts = 0, last_login = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Incrementa o contador de falhas e bloqueia a conta ao atingir o
    /// limite, num único UPDATE atômico. Devolve (tentativas, bloqueado).
    pub async fn record_login_failure<'e, E>(
        &self,
        executor: E,
        id: i64,
        max_attempts: i64,
    ) -> Result<(i64, bool), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64, bool) = sqlx::query_as(
            r#"
            UPDATE users
            SET failed_attempts = failed_attempts + 1,
                locked = CASE WHEN failed_attempts + 1 >= ? THEN 1 ELSE locked END,
                updated_at = ?
            WHERE id = ?
            RETURNING failed_attempts, locked
            "#,
        )
        .bind(max_attempts)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Desbloqueio explícito: limpa o sinalizador E o contador.
    pub async fn unlock<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET locked = 0, failed_attempts = 0, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        id: i64,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_reset_token<'e, E>(
        &self,
        executor: E,
        id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE users SET reset_token = ?, reset_token_expiry = ?, updated_at = ? WHERE id = ?",
        )
        .bind(token)
        .bind(expiry)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Consome o token após uma redefinição bem-sucedida. Também limpa o
    /// estado de bloqueio: a redefinição vale como desbloqueio explícito.
    pub async fn clear_reset_token<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = NULL, reset_token_expiry = NULL,
                locked = 0, failed_attempts = 0, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Exclusão administrativa direta.
    pub async fn delete_user<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
