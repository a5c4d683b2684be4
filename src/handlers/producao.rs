// src/handlers/producao.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::producao::{OpDetalhe, OrdemProducao, OrdemProducaoPayload},
};

pub async fn criar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<OrdemProducaoPayload>,
) -> Result<(StatusCode, Json<OrdemProducao>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let op = app_state.producao_service.criar_op(&payload).await?;
    Ok((StatusCode::CREATED, Json(op)))
}

#[derive(Debug, Deserialize)]
pub struct FiltroOp {
    pub cliente: Option<String>,
}

pub async fn listar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(filtro): Query<FiltroOp>,
) -> Result<Json<Vec<OrdemProducao>>, AppError> {
    let ops = app_state
        .producao_service
        .listar(filtro.cliente.as_deref())
        .await?;
    Ok(Json(ops))
}

pub async fn detalhar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OpDetalhe>, AppError> {
    let detalhe = app_state.producao_service.detalhar(id).await?;
    Ok(Json(detalhe))
}

pub async fn editar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrdemProducaoPayload>,
) -> Result<Json<OrdemProducao>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let op = app_state.producao_service.editar_op(id, &payload).await?;
    Ok(Json(op))
}

pub async fn excluir(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.producao_service.excluir_op(id, user.papel).await?;
    Ok(StatusCode::NO_CONTENT)
}
