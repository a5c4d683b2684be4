// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Papel, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // bcrypt é caro, roda fora do executor async
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        papel: Papel,
    ) -> Result<User, AppError> {
        let hashed = self.hash_password(password).await?;
        self.user_repo
            .create_user(&self.pool, username, &hashed, papel)
            .await
    }

    // --- Administração de usuários (rotas restritas a admin) ---

    pub async fn listar_usuarios(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.get_all().await
    }

    pub async fn editar_usuario(
        &self,
        id: Uuid,
        username: &str,
        papel: Papel,
        nova_senha: Option<&str>,
    ) -> Result<User, AppError> {
        let hash = match nova_senha {
            Some(senha) if !senha.is_empty() => Some(self.hash_password(senha).await?),
            _ => None,
        };
        self.user_repo
            .update_user(id, username, papel, hash.as_deref())
            .await
    }

    /// Exclui um usuário. O próprio admin logado não pode se excluir.
    pub async fn excluir_usuario(&self, id: Uuid, solicitante: &User) -> Result<(), AppError> {
        if id == solicitante.id {
            return Err(AppError::BusinessRule(
                "Você não pode excluir o seu próprio usuário.".to_string(),
            ));
        }
        self.user_repo.delete_user(id).await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
