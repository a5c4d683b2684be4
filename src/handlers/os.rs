// src/handlers/os.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, policy},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Papel,
        os::{Despesa, DespesaPayload, FecharRevisaoPayload, OsFiltro, OsPayload, OsVersao},
    },
};

/// Anula os campos monetários da resposta para quem não pode ver valores.
/// Trabalha sobre o JSON já serializado para valer tanto para a listagem
/// quanto para o detalhe.
fn mascarar_valores(mut json: Value) -> Value {
    fn anular(obj: &mut Value, campos: &[&str]) {
        if let Some(mapa) = obj.as_object_mut() {
            for campo in campos {
                if let Some(v) = mapa.get_mut(*campo) {
                    *v = Value::Null;
                }
            }
        }
    }

    anular(&mut json, &["valor"]);

    for lista in ["custosOperacionais", "custosVisitas"] {
        if let Some(custos) = json.get_mut(lista).and_then(Value::as_array_mut) {
            for custo in custos {
                anular(custo, &["valor", "valorRealizado"]);
            }
        }
    }

    // Snapshots carregam valores dentro do JSON arquivado
    if let Some(versoes) = json.get_mut("versoes").and_then(Value::as_array_mut) {
        for versao in versoes {
            anular(versao, &["dadosSnapshot"]);
        }
    }

    json
}

fn responder(json: Value, papel: Papel) -> Json<Value> {
    if policy::pode_ver_valores(papel) {
        Json(json)
    } else {
        Json(mascarar_valores(json))
    }
}

pub async fn criar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<OsPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let os = app_state.os_service.criar_os(&payload, user.papel).await?;
    let json = serde_json::to_value(&os).map_err(anyhow::Error::from)?;

    Ok((StatusCode::CREATED, responder(json, user.papel)))
}

pub async fn listar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(filtro): Query<OsFiltro>,
) -> Result<Json<Value>, AppError> {
    let lista = app_state.os_service.listar(&filtro).await?;

    if policy::pode_ver_valores(user.papel) {
        let json = serde_json::to_value(&lista).map_err(anyhow::Error::from)?;
        return Ok(Json(json));
    }

    let mascaradas: Vec<Value> = lista
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::from)?
        .into_iter()
        .map(mascarar_valores)
        .collect();

    Ok(Json(Value::Array(mascaradas)))
}

pub async fn detalhar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let detalhe = app_state.os_service.detalhar(id).await?;
    let json = serde_json::to_value(&detalhe).map_err(anyhow::Error::from)?;

    Ok(responder(json, user.papel))
}

pub async fn editar(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OsPayload>,
) -> Result<Json<Value>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let os = app_state
        .os_service
        .editar_os(id, &payload, user.papel)
        .await?;
    let json = serde_json::to_value(&os).map_err(anyhow::Error::from)?;

    Ok(responder(json, user.papel))
}

/// Consulta enxuta para o formulário de OP: só o nome do cliente.
pub async fn info(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let cliente = app_state.os_service.cliente_da_os(id).await?;
    Ok(Json(serde_json::json!({ "cliente": cliente })))
}

pub async fn fechar_revisao(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FecharRevisaoPayload>,
) -> Result<(StatusCode, Json<OsVersao>), AppError> {
    let versao = app_state
        .os_service
        .fechar_revisao(id, &user, payload.motivo.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(versao)))
}

pub async fn listar_versoes(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let versoes = app_state.os_service.listar_versoes(id).await?;
    let mut json = serde_json::to_value(&versoes).map_err(anyhow::Error::from)?;

    // O snapshot arquivado carrega valores monetários
    if !policy::pode_ver_valores(user.papel)
        && let Some(lista) = json.as_array_mut()
    {
        for versao in lista {
            if let Some(v) = versao.get_mut("dadosSnapshot") {
                *v = Value::Null;
            }
        }
    }

    Ok(Json(json))
}

// --- Despesas (tabela de consulta dos custos) ---

pub async fn listar_despesas(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Despesa>>, AppError> {
    let despesas = app_state.os_service.listar_despesas().await?;
    Ok(Json(despesas))
}

pub async fn criar_despesa(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<DespesaPayload>,
) -> Result<(StatusCode, Json<Despesa>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Cadastrar novas despesas molda os custos previstos das OS
    if !policy::pode_editar_previsto(user.papel) {
        return Err(AppError::AccessDenied(
            "Você não tem permissão para cadastrar despesas.",
        ));
    }

    let despesa = app_state.os_service.criar_despesa(&payload).await?;
    Ok((StatusCode::CREATED, Json(despesa)))
}
