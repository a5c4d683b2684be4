// src/handlers/compras.rs

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
    models::compras::{
        Fornecedor, FornecedorPayload, PedidoCompra, PedidoCompraPayload, PedidoDetalhe,
        PedidoGerado, SolicitacaoCompra, SolicitacaoCompraPayload, SolicitacaoDetalhe,
        SolicitacaoStatus, TipoFornecedor, TipoFornecedorPayload,
    },
};

// --- Tipos de fornecedor ---

pub async fn listar_tipos(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<TipoFornecedor>>, AppError> {
    let tipos = app_state.compras_service.listar_tipos_fornecedor().await?;
    Ok(Json(tipos))
}

/// Criação inline usada pelo formulário de fornecedor.
pub async fn criar_tipo(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<TipoFornecedorPayload>,
) -> Result<(StatusCode, Json<TipoFornecedor>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tipo = app_state
        .compras_service
        .criar_tipo_fornecedor(&payload.descricao)
        .await?;
    Ok((StatusCode::CREATED, Json(tipo)))
}

// --- Fornecedores ---

pub async fn listar_fornecedores(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Fornecedor>>, AppError> {
    let fornecedores = app_state.compras_service.listar_fornecedores().await?;
    Ok(Json(fornecedores))
}

pub async fn criar_fornecedor(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<FornecedorPayload>,
) -> Result<(StatusCode, Json<Fornecedor>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let fornecedor = app_state.compras_service.criar_fornecedor(&payload).await?;
    Ok((StatusCode::CREATED, Json(fornecedor)))
}

pub async fn detalhar_fornecedor(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fornecedor>, AppError> {
    let fornecedor = app_state.compras_service.detalhar_fornecedor(id).await?;
    Ok(Json(fornecedor))
}

pub async fn editar_fornecedor(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FornecedorPayload>,
) -> Result<Json<Fornecedor>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let fornecedor = app_state
        .compras_service
        .editar_fornecedor(id, &payload)
        .await?;
    Ok(Json(fornecedor))
}

pub async fn excluir_fornecedor(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .compras_service
        .excluir_fornecedor(id, user.papel)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Solicitações de compra ---

#[derive(Debug, Deserialize)]
pub struct FiltroSolicitacao {
    pub status: Option<SolicitacaoStatus>,
}

pub async fn criar_solicitacao(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<SolicitacaoCompraPayload>,
) -> Result<(StatusCode, Json<SolicitacaoCompra>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let solicitacao = app_state
        .compras_service
        .criar_solicitacao(user.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(solicitacao)))
}

pub async fn listar_solicitacoes(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(filtro): Query<FiltroSolicitacao>,
) -> Result<Json<Vec<SolicitacaoCompra>>, AppError> {
    let solicitacoes = app_state
        .compras_service
        .listar_solicitacoes(filtro.status)
        .await?;
    Ok(Json(solicitacoes))
}

pub async fn detalhar_solicitacao(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SolicitacaoDetalhe>, AppError> {
    let detalhe = app_state.compras_service.detalhar_solicitacao(id).await?;
    Ok(Json(detalhe))
}

// --- Pedidos de compra ---

pub async fn gerar_pedido(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(solicitacao_id): Path<Uuid>,
    Json(payload): Json<PedidoCompraPayload>,
) -> Result<(StatusCode, Json<PedidoGerado>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let gerado = app_state
        .compras_service
        .gerar_pedido(solicitacao_id, &payload, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(gerado)))
}

pub async fn listar_pedidos(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PedidoCompra>>, AppError> {
    let pedidos = app_state.compras_service.listar_pedidos().await?;
    Ok(Json(pedidos))
}

pub async fn detalhar_pedido(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PedidoDetalhe>, AppError> {
    let detalhe = app_state.compras_service.detalhar_pedido(id).await?;
    Ok(Json(detalhe))
}
