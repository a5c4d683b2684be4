// src/handlers/produtos.rs

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
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::produto::{Produto, ProdutoPayload},
};

#[derive(Debug, Deserialize)]
pub struct BuscaProduto {
    #[serde(default)]
    pub q: String,
}

pub async fn criar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<(StatusCode, Json<Produto>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produto = app_state.produto_service.criar(&payload).await?;
    Ok((StatusCode::CREATED, Json(produto)))
}

pub async fn listar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Produto>>, AppError> {
    let produtos = app_state.produto_service.listar().await?;
    Ok(Json(produtos))
}

/// Autocomplete das telas de solicitação de compra.
pub async fn buscar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(busca): Query<BuscaProduto>,
) -> Result<Json<Vec<Produto>>, AppError> {
    let produtos = app_state.produto_service.buscar(&busca.q).await?;
    Ok(Json(produtos))
}

pub async fn detalhar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Produto>, AppError> {
    let produto = app_state.produto_service.detalhar(id).await?;
    Ok(Json(produto))
}

/// Consulta rápida por part number (preenche descrição e custo no front).
pub async fn por_part_number(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(part_number): Path<String>,
) -> Result<Json<Produto>, AppError> {
    let produto = app_state
        .produto_service
        .por_part_number(&part_number)
        .await?;
    Ok(Json(produto))
}

pub async fn editar(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<Json<Produto>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produto = app_state.produto_service.editar(id, &payload).await?;
    Ok(Json(produto))
}

pub async fn excluir(
    RequireAdmin(_admin): RequireAdmin,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.produto_service.excluir(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
