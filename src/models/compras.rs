// src/models/compras.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "solicitacao_status")]
pub enum SolicitacaoStatus {
    #[sqlx(rename = "Pendente")]
    #[serde(rename = "Pendente")]
    Pendente,
    #[sqlx(rename = "Em Pedido")]
    #[serde(rename = "Em Pedido")]
    EmPedido,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pedido_status")]
pub enum PedidoStatus {
    #[sqlx(rename = "Em Cotação")]
    #[serde(rename = "Em Cotação")]
    EmCotacao,
    #[sqlx(rename = "Aguardando Aprovação")]
    #[serde(rename = "Aguardando Aprovação")]
    AguardandoAprovacao,
    #[sqlx(rename = "Aprovado")]
    #[serde(rename = "Aprovado")]
    Aprovado,
}

// --- Entidades ---

/// Tipo de fornecedor: tabela de consulta extensível pelo usuário.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TipoFornecedor {
    pub id: Uuid,
    pub descricao: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fornecedor {
    pub id: Uuid,
    pub cod_sap: Option<String>,
    pub razao_social: String,
    pub nome_fantasia: Option<String>,
    pub tipo_fornecedor_id: Uuid,
    pub documento: String,
    pub inscricao_estadual: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub pais: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoCompra {
    pub id: Uuid,
    pub user_id: Uuid,
    pub observacao: Option<String>,
    pub status: SolicitacaoStatus,
    pub data_criacao: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoItem {
    pub id: Uuid,
    pub solicitacao_id: Uuid,
    pub produto_id: Option<Uuid>,
    pub descricao_item: String,
    pub quantidade: Decimal,
    pub unidade: String,
    pub prioridade: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PedidoCompra {
    pub id: Uuid,
    pub numero_pedido: String,
    pub solicitacao_origem_id: Uuid,
    pub fornecedor_id: Uuid,
    pub condicao_pagamento: String,
    pub prazo_entrega: Option<String>,
    pub observacoes: Option<String>,
    pub valor_total: Decimal,
    pub status: PedidoStatus,
    // Preenchidos se e somente se status = Aprovado.
    pub aprovado_por_id: Option<Uuid>,
    pub data_aprovacao: Option<DateTime<Utc>>,
    pub data_criacao: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PedidoItem {
    pub id: Uuid,
    pub pedido_id: Uuid,
    pub descricao: String,
    pub quantidade: Decimal,
    pub unidade: Option<String>,
    pub valor_unitario: Decimal,
    pub valor_total_item: Decimal,
}

/// Solicitação com seus itens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoDetalhe {
    #[serde(flatten)]
    pub solicitacao: SolicitacaoCompra,
    pub itens: Vec<SolicitacaoItem>,
}

/// Pedido com seus itens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoDetalhe {
    #[serde(flatten)]
    pub pedido: PedidoCompra,
    pub itens: Vec<PedidoItem>,
}

// --- Payloads ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct TipoFornecedorPayload {
    #[validate(length(min = 1, max = 200, message = "A descrição do tipo é obrigatória."))]
    pub descricao: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FornecedorPayload {
    pub cod_sap: Option<String>,
    #[validate(length(min = 1, max = 150, message = "A razão social é obrigatória."))]
    pub razao_social: String,
    pub nome_fantasia: Option<String>,
    pub tipo_fornecedor_id: Uuid,
    #[validate(length(min = 1, max = 20, message = "O documento (CNPJ/CPF) é obrigatório."))]
    pub documento: String,
    pub inscricao_estadual: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    #[serde(default = "pais_padrao")]
    pub pais: String,
}

fn pais_padrao() -> String {
    "Brasil".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoItemPayload {
    pub produto_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "A descrição do item é obrigatória."))]
    pub descricao_item: String,
    #[validate(custom(function = "validate_not_negative"))]
    pub quantidade: Decimal,
    #[serde(default = "unidade_padrao")]
    pub unidade: String,
    #[serde(default = "prioridade_padrao")]
    pub prioridade: String,
}

fn unidade_padrao() -> String {
    "UN".to_string()
}

fn prioridade_padrao() -> String {
    "Normal".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoCompraPayload {
    pub observacao: Option<String>,
    #[validate(length(min = 1, message = "A solicitação precisa de ao menos um item."), nested)]
    pub itens: Vec<SolicitacaoItemPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PedidoItemPayload {
    pub produto_id: Option<Uuid>,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    #[validate(custom(function = "validate_not_negative"))]
    pub quantidade: Decimal,
    pub unidade: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub valor_unitario: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PedidoCompraPayload {
    pub fornecedor_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "A condição de pagamento é obrigatória."))]
    pub condicao_pagamento: String,
    pub prazo_entrega: Option<String>,
    pub observacoes: Option<String>,
    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub itens: Vec<PedidoItemPayload>,
    // "Salvar e Aprovar" (true) vs "Salvar Cotação" (false).
    #[serde(default)]
    pub aprovar: bool,
}

/// Resultado da geração do pedido, com o aviso de alçada quando o valor
/// excede o limite do solicitante.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoGerado {
    pub pedido: PedidoCompra,
    pub itens: Vec<PedidoItem>,
    pub aviso: Option<String>,
}
