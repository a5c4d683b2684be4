// src/handlers/usuarios.rs
//
// Administração de usuários: todas as rotas exigem papel admin.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::auth::{User, UserPayload},
};

pub async fn listar(
    RequireAdmin(_admin): RequireAdmin,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let usuarios = app_state.auth_service.listar_usuarios().await?;
    Ok(Json(usuarios))
}

pub async fn criar(
    RequireAdmin(_admin): RequireAdmin,
    State(app_state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let senha = payload.password.as_deref().ok_or_else(|| {
        AppError::BusinessRule("A senha é obrigatória na criação do usuário.".to_string())
    })?;

    let usuario = app_state
        .auth_service
        .create_user(&payload.username, senha, payload.papel)
        .await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

pub async fn editar(
    RequireAdmin(_admin): RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .auth_service
        .editar_usuario(id, &payload.username, payload.papel, payload.password.as_deref())
        .await?;

    Ok(Json(usuario))
}

pub async fn excluir(
    RequireAdmin(admin): RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.excluir_usuario(id, &admin).await?;
    Ok(StatusCode::NO_CONTENT)
}
