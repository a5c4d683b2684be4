// src/handlers/catalogo.rs
//
// Exposição somente-leitura dos catálogos fixos (máquinas por setor e
// processos por departamento) para os formulários do front.

use std::collections::BTreeMap;

use axum::{Json, extract::Path};

use crate::{
    common::{catalogo, error::AppError},
    middleware::auth::AuthenticatedUser,
};

pub async fn maquinas_por_setor(
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    Json(catalogo::MAQUINAS_POR_SETOR.clone())
}

pub async fn maquinas_do_setor(
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(setor): Path<String>,
) -> Result<Json<Vec<&'static str>>, AppError> {
    let maquinas = catalogo::maquinas_do_setor(&setor)
        .ok_or(AppError::NotFound("Setor não catalogado."))?;
    Ok(Json(maquinas.to_vec()))
}

pub async fn processos_por_departamento(
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    Json(catalogo::PROCESSOS_POR_DEPARTAMENTO.clone())
}

pub async fn processos_do_departamento(
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(departamento): Path<String>,
) -> Result<Json<Vec<&'static str>>, AppError> {
    let processos = catalogo::processos_do_departamento(&departamento)
        .ok_or(AppError::NotFound("Departamento não catalogado."))?;
    Ok(Json(processos.to_vec()))
}
