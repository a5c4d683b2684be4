// src/handlers/manutencao.rs

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
    middleware::auth::AuthenticatedUser,
    models::manutencao::{ManutDetalhe, OsManutencao, OsManutencaoPayload},
};

pub async fn criar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<OsManutencaoPayload>,
) -> Result<(StatusCode, Json<OsManutencao>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let os = app_state.manutencao_service.criar_os(&payload).await?;
    Ok((StatusCode::CREATED, Json(os)))
}

pub async fn listar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<OsManutencao>>, AppError> {
    let lista = app_state.manutencao_service.listar().await?;
    Ok(Json(lista))
}

pub async fn detalhar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ManutDetalhe>, AppError> {
    let detalhe = app_state.manutencao_service.detalhar(id).await?;
    Ok(Json(detalhe))
}

pub async fn editar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OsManutencaoPayload>,
) -> Result<Json<OsManutencao>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let os = app_state.manutencao_service.editar_os(id, &payload).await?;
    Ok(Json(os))
}

pub async fn excluir(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .manutencao_service
        .excluir_os(id, user.papel)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
