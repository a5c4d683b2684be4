// src/models/producao.rs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Ordem de Produção: trabalho interno de fábrica amarrado a uma OS.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrdemProducao {
    pub id: Uuid,
    pub numero_sequencial: i32,
    pub os_id: Uuid,

    pub status: String,
    pub departamento: String,
    pub cliente: String,
    pub codigo: String,

    pub part_number_produto: Option<String>,
    pub quantidade: Decimal,
    pub largura: Decimal,
    pub comprimento: Decimal,
    pub pe_direito: Decimal,
    pub piso: Option<String>,
    pub acessorios: Option<String>,

    pub data_emissao: NaiveDate,
    pub data_inicio_previsto: NaiveDate,
    pub data_termino_previsto: NaiveDate,
    pub data_carregamento: NaiveDate,
    pub data_fechamento: Option<NaiveDate>,

    pub tipo_contrato: String,
    pub tipo_op: String,
    pub setor: String,
    pub observacoes: Option<String>,
}

/// Apontamento de produção por turno/processo/máquina.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ControleProducao {
    pub id: Uuid,
    pub ordem_producao_id: Uuid,
    pub turno: Option<String>,
    pub departamento: Option<String>,
    pub obs_prod: Option<String>,
    pub processo: Option<String>,
    pub maquina: Option<String>,
    pub operador: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub hora_inicio: Option<NaiveTime>,
    pub data_pausa: Option<NaiveDate>,
    pub motivo_pausa: Option<String>,
    pub data_termino: Option<NaiveDate>,
    pub hora_termino: Option<NaiveTime>,
    pub qualidade: Option<String>,
}

/// Linha de romaneio (lista de embarque) da OP.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Romaneio {
    pub id: Uuid,
    pub ordem_producao_id: Uuid,
    pub id_item: Option<i32>,
    pub descricao: Option<String>,
    pub quantidade: Option<i32>,
    pub materia_prima_utilizada: Option<String>,
}

/// Detalhe da OP com apontamentos, romaneio e a duração somada (HH:MM).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpDetalhe {
    #[serde(flatten)]
    pub op: OrdemProducao,
    pub controles_producao: Vec<ControleProducao>,
    pub romaneios: Vec<Romaneio>,
    pub duracao_total: String,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ControleProducaoPayload {
    pub turno: Option<String>,
    pub departamento: Option<String>,
    pub obs_prod: Option<String>,
    pub processo: Option<String>,
    pub maquina: Option<String>,
    pub operador: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub hora_inicio: Option<NaiveTime>,
    pub data_pausa: Option<NaiveDate>,
    pub motivo_pausa: Option<String>,
    pub data_termino: Option<NaiveDate>,
    pub hora_termino: Option<NaiveTime>,
    pub qualidade: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RomaneioPayload {
    pub id_item: Option<i32>,
    pub descricao: Option<String>,
    pub quantidade: Option<i32>,
    pub materia_prima_utilizada: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrdemProducaoPayload {
    pub os_id: Uuid,

    #[validate(length(min = 1, message = "O status é obrigatório."))]
    pub status: String,
    #[validate(length(min = 1, message = "O departamento é obrigatório."))]
    pub departamento: String,
    #[validate(length(min = 1, message = "O cliente é obrigatório."))]
    pub cliente: String,
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub codigo: String,

    pub part_number_produto: Option<String>,
    pub quantidade: Decimal,
    pub largura: Decimal,
    pub comprimento: Decimal,
    pub pe_direito: Decimal,
    pub piso: Option<String>,
    pub acessorios: Option<String>,

    pub data_emissao: NaiveDate,
    pub data_inicio_previsto: NaiveDate,
    pub data_termino_previsto: NaiveDate,
    pub data_carregamento: NaiveDate,
    pub data_fechamento: Option<NaiveDate>,

    #[validate(length(min = 1, message = "O tipo de contrato é obrigatório."))]
    pub tipo_contrato: String,
    #[validate(length(min = 1, message = "O tipo de OP é obrigatório."))]
    pub tipo_op: String,
    #[validate(length(min = 1, message = "O setor é obrigatório."))]
    pub setor: String,
    pub observacoes: Option<String>,

    #[serde(default)]
    pub controles_producao: Vec<ControleProducaoPayload>,
    #[serde(default)]
    pub romaneios: Vec<RomaneioPayload>,
}
