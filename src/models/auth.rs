// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Níveis de acesso da equipe (mapeando o enum `papel` do Postgres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "papel", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    Operador, // Acesso básico
    Compras,  // Lança custos realizados
    Gerente,  // Vê custos e edita cadastro
    Admin,    // Total
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub papel: Papel,
    pub created_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserPayload {
    #[validate(length(min = 3, message = "O nome de usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 4, message = "A senha deve ter no mínimo 4 caracteres."))]
    pub password: String,
}

// Dados para criação/edição de usuário (somente Admin)
#[derive(Debug, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 3, max = 20, message = "O nome de usuário deve ter de 3 a 20 caracteres."))]
    pub username: String,
    // Opcional na edição: vazio mantém a senha atual.
    #[validate(length(min = 4, message = "A senha deve ter no mínimo 4 caracteres."))]
    pub password: Option<String>,
    pub papel: Papel,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
