// src/models/manutencao.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// OS de Manutenção (corretiva, preventiva, preditiva...).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OsManutencao {
    pub id: Uuid,
    pub numero: String,
    pub data_abertura: NaiveDate,
    pub hora_abert: NaiveTime,
    pub data_encerramento: Option<NaiveDate>,
    pub solicitante: String,
    pub area_setor: Option<String>,
    pub maq_equip: String,
    pub ocorrencia: Option<String>,
    pub parada: String, // 'Sim' ou 'Não'

    // Tipos de manutenção (checkboxes)
    pub manut_corretiva: bool,
    pub manut_preventiva: bool,
    pub manut_preditiva: bool,
    pub inspecao: bool,
    pub melhorias: bool,
    pub predial: bool,
    pub outro: bool,

    // Detalhes
    pub sintoma: Option<String>,
    pub causa: Option<String>,
    pub intervencao: Option<String>,
    pub materiais_utilizados: Option<String>,
    pub materiais_comprados: Option<String>,
    pub ficha_tec: Option<String>,
    pub obs_manut: Option<String>,
    pub assinatura1: Option<String>,
    pub assinatura2: Option<String>,
}

/// Apontamento de manutentor (quem atuou e quando).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ManutApont {
    pub id: Uuid,
    pub os_manutencao_id: Uuid,
    pub manutentor: String,
    pub data_inicio: Option<NaiveDate>,
    pub hora_inicio: Option<NaiveTime>,
    pub data_termino: Option<NaiveDate>,
    pub hora_termino: Option<NaiveTime>,
}

/// Detalhe da OS de manutenção com apontamentos e duração somada (HH:MM).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManutDetalhe {
    #[serde(flatten)]
    pub os: OsManutencao,
    pub apontamentos: Vec<ManutApont>,
    pub duracao_total: String,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManutApontPayload {
    #[validate(length(min = 1, message = "O manutentor é obrigatório."))]
    pub manutentor: String,
    pub data_inicio: Option<NaiveDate>,
    pub hora_inicio: Option<NaiveTime>,
    pub data_termino: Option<NaiveDate>,
    pub hora_termino: Option<NaiveTime>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OsManutencaoPayload {
    pub data_abertura: NaiveDate,
    pub hora_abert: NaiveTime,
    pub data_encerramento: Option<NaiveDate>,

    #[validate(length(min = 1, message = "O solicitante é obrigatório."))]
    pub solicitante: String,
    pub area_setor: Option<String>,
    #[validate(length(min = 1, message = "A máquina/equipamento é obrigatória."))]
    pub maq_equip: String,
    pub ocorrencia: Option<String>,
    #[serde(default = "parada_padrao")]
    pub parada: String,

    #[serde(default)]
    pub manut_corretiva: bool,
    #[serde(default)]
    pub manut_preventiva: bool,
    #[serde(default)]
    pub manut_preditiva: bool,
    #[serde(default)]
    pub inspecao: bool,
    #[serde(default)]
    pub melhorias: bool,
    #[serde(default)]
    pub predial: bool,
    #[serde(default)]
    pub outro: bool,

    pub sintoma: Option<String>,
    pub causa: Option<String>,
    pub intervencao: Option<String>,
    pub materiais_utilizados: Option<String>,
    pub materiais_comprados: Option<String>,
    pub ficha_tec: Option<String>,
    pub obs_manut: Option<String>,
    pub assinatura1: Option<String>,
    pub assinatura2: Option<String>,

    #[serde(default)]
    pub apontamentos: Vec<ManutApontPayload>,
}

fn parada_padrao() -> String {
    "Não".to_string()
}
