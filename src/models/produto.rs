// src/models/produto.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: Uuid,
    pub part_number: String,
    pub sku: Option<String>,
    pub descricao: String,
    pub tipo_de_material: Option<String>,
    pub custo: Decimal,
}

/// Resultado da importação de catálogo via CSV.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumoImportacao {
    pub importados: usize,
    pub ignorados: usize,
    pub removidos: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoPayload {
    #[validate(length(min = 1, message = "O part number é obrigatório."))]
    pub part_number: String,
    pub sku: Option<String>,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    pub tipo_de_material: Option<String>,
    #[serde(default)]
    pub custo: Decimal,
}
