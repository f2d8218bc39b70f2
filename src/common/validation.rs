// src/common/validation.rs
//
// Políticas de senha, e-mail e nome de usuário aplicadas ANTES de
// qualquer persistência. As regras de senha são avaliadas em ordem de
// prioridade: a primeira violação interrompe a verificação.

use std::sync::LazyLock;

use regex::Regex;

use crate::common::error::AppError;

/// Conjunto de caracteres especiais aceitos na senha.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_USERNAME_LEN: usize = 3;

// local-part@dominio.tld, com TLD de pelo menos 2 letras.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("regex de e-mail inválida")
});

pub fn validar_senha(senha: &str) -> Result<(), AppError> {
    if senha.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "A senha deve ter no mínimo 8 caracteres.".to_string(),
        ));
    }
    if !senha.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "A senha deve conter ao menos uma letra maiúscula.".to_string(),
        ));
    }
    if !senha.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "A senha deve conter ao menos uma letra minúscula.".to_string(),
        ));
    }
    if !senha.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "A senha deve conter ao menos um número.".to_string(),
        ));
    }
    if !senha.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AppError::Validation(
            "A senha deve conter ao menos um caractere especial (!@#$%^&*(),.?\":{}|<>).".to_string(),
        ));
    }
    Ok(())
}

pub fn validar_email(email: &str) -> Result<(), AppError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "O e-mail fornecido é inválido.".to_string(),
        ))
    }
}

pub fn validar_username(username: &str) -> Result<(), AppError> {
    if username.trim().chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::Validation(
            "O nome de usuário deve ter no mínimo 3 caracteres.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(m)) => m,
            other => panic!("esperava erro de validação, veio {:?}", other.err()),
        }
    }

    #[test]
    fn senha_curta_rejeitada_pelo_comprimento_antes_das_outras_regras() {
        // "abc" também viola maiúscula/número/especial, mas o comprimento vence.
        assert!(msg(validar_senha("abc")).contains("8 caracteres"));
        assert!(msg(validar_senha("A1!")).contains("8 caracteres"));
    }

    #[test]
    fn regras_de_senha_em_ordem_de_prioridade() {
        assert!(msg(validar_senha("abcdefg1!")).contains("maiúscula"));
        assert!(msg(validar_senha("ABCDEFG1!")).contains("minúscula"));
        assert!(msg(validar_senha("Abcdefgh!")).contains("número"));
        assert!(msg(validar_senha("Abcdefg1")).contains("especial"));
    }

    #[test]
    fn senha_valida_aceita() {
        assert!(validar_senha("Secret1!").is_ok());
        assert!(validar_senha("S3nh@Forte").is_ok());
    }

    #[test]
    fn emails_validos_aceitos() {
        assert!(validar_email("joao@email.com").is_ok());
        assert!(validar_email("maria.santos+loja@sub.dominio.com.br").is_ok());
        assert!(validar_email("a_b%c@x-y.io").is_ok());
    }

    #[test]
    fn emails_invalidos_rejeitados() {
        assert!(validar_email("sem-arroba.com").is_err());
        assert!(validar_email("joao@email").is_err());
        assert!(validar_email("joao@email.c").is_err());
        assert!(validar_email("@email.com").is_err());
        assert!(validar_email("joao@.com").is_err());
    }

    #[test]
    fn username_minimo_tres_caracteres() {
        assert!(validar_username("jo").is_err());
        assert!(validar_username("joao").is_ok());
    }
}
