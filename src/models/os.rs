// src/models/os.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "os_fase")]
pub enum OsFase {
    #[sqlx(rename = "Pré-OS")]
    #[serde(rename = "Pré-OS")]
    PreOs,
    #[sqlx(rename = "OS")]
    #[serde(rename = "OS")]
    Os,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "os_status")]
pub enum OsStatus {
    #[sqlx(rename = "Aberta")]
    #[serde(rename = "Aberta")]
    Aberta,
    #[sqlx(rename = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    EmAndamento,
    #[sqlx(rename = "Concluída")]
    #[serde(rename = "Concluída")]
    Concluida,
    #[sqlx(rename = "Cancelada")]
    #[serde(rename = "Cancelada")]
    Cancelada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_despesa")]
pub enum TipoDespesa {
    #[sqlx(rename = "Operacional")]
    #[serde(rename = "Operacional")]
    Operacional,
    #[sqlx(rename = "Visita")]
    #[serde(rename = "Visita")]
    Visita,
}

// --- Entidades ---

/// Ordem de Serviço: contrato de locação/serviço junto ao cliente.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Os {
    pub id: Uuid,

    // Dados principais
    pub numero: String,
    pub cliente: String,
    pub fase: OsFase,
    pub status: OsStatus,
    pub data_criacao: DateTime<Utc>,
    pub empresa: Option<String>,

    // Datas
    pub data_emissao: NaiveDate,
    pub data_inicio: Option<NaiveDate>,
    pub data_termino: Option<NaiveDate>,
    pub data_entrega: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,

    // Contrato e valores
    pub tipo_contrato: Option<String>,
    pub valor: Decimal,

    // Detalhes técnicos
    pub tipo_loc: Option<String>,
    pub tipo_os: Option<String>,
    pub modelo: Option<String>,
    pub qtde: Option<Decimal>,
    pub largura: Option<Decimal>,
    pub comprim: Option<Decimal>,
    pub pe_direito: Option<Decimal>,
    pub piso: Option<String>,
    pub acessorios: Option<String>,
    pub observacoes: Option<String>,
    pub obs2: Option<String>,

    // Dados do cliente
    pub razao: Option<String>,
    pub cnpj: Option<String>,
    pub insc: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,

    // Responsáveis
    pub segtrab: Option<String>,
    pub integracao: Option<String>,
    pub vendedor: Option<String>,

    // Endereço principal
    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub cep: Option<String>,

    // Endereço de faturamento
    pub fat_endereco: Option<String>,
    pub fat_bairro: Option<String>,
    pub fat_cidade: Option<String>,
    pub fat_uf: Option<String>,
    pub fat_cep: Option<String>,
    pub fat_emails: Option<String>,

    // Endereço de montagem
    pub mont_endereco: Option<String>,
    pub mont_bairro: Option<String>,
    pub mont_cidade: Option<String>,
    pub mont_uf: Option<String>,
    pub mont_cep: Option<String>,

    // Histórico de versão: incrementa 1 a cada snapshot, nunca decrementa.
    pub revisao: i32,
}

/// Versão arquivada de uma OS. Imutável: só é criada ao fechar revisão e
/// só some em cascata quando a OS pai é excluída.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OsVersao {
    pub id: Uuid,
    pub os_id: Uuid,
    pub numero_revisao: i32,
    pub data_arquivamento: DateTime<Utc>,
    pub usuario_responsavel: String,
    pub motivo: String,
    pub dados_snapshot: String, // JSON completo
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Despesa {
    pub id: Uuid,
    pub descricao: String,
    pub tipo: TipoDespesa,
}

/// Linha de custo (operacional ou de visita) já com a descrição da despesa
/// resolvida via join.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustoDetalhe {
    pub id: Uuid,
    pub os_id: Uuid,
    pub despesa_id: Uuid,
    pub despesa_descricao: String,
    pub valor: Decimal,
    pub valor_realizado: Option<Decimal>,
    pub data: NaiveDate,
    pub observacao: Option<String>,
    pub responsavel: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Carregamento {
    pub id: Uuid,
    pub os_id: Uuid,
    pub data: NaiveDate,
    pub placa_caminhao: Option<String>,
    pub documento_referencia: Option<String>,
    pub observacao: Option<String>,
}

// --- Snapshot (payload serializado em os_versao.dados_snapshot) ---
//
// Campos opcionais da OS entram com default explícito (string vazia ou
// null), resolvido na montagem e não no acesso.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnderecos {
    pub fat_endereco: String,
    pub fat_cidade: String,
    pub mont_endereco: String,
    pub mont_cidade: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCabecalho {
    pub numero: String,
    pub cliente: String,
    pub fase: OsFase,
    pub empresa: String,
    pub status: OsStatus,
    pub valor_total: Decimal,
    pub data_emissao: NaiveDate,
    pub data_entrega: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub tipo_contrato: String,
    pub tipo_os: String,
    pub observacoes: Option<String>,
    pub obs2: String,
    pub enderecos: SnapshotEnderecos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCusto {
    pub tipo: TipoDespesa,
    pub despesa: String,
    pub valor_previsto: Decimal,
    pub valor_realizado: Option<Decimal>,
    pub data: NaiveDate,
    pub responsavel: String,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCarregamento {
    pub data: NaiveDate,
    pub placa: Option<String>,
    pub doc: Option<String>,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDados {
    pub cabecalho: SnapshotCabecalho,
    pub custos: Vec<SnapshotCusto>,
    pub carregamentos: Vec<SnapshotCarregamento>,
}

/// Detalhe completo da OS: cabeçalho mais todas as linhas filhas.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDetalhe {
    #[serde(flatten)]
    pub os: Os,
    pub custos_operacionais: Vec<CustoDetalhe>,
    pub custos_visitas: Vec<CustoDetalhe>,
    pub carregamentos: Vec<Carregamento>,
    pub versoes: Vec<OsVersao>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustoPayload {
    pub despesa_id: Uuid,
    pub valor: Decimal,
    pub valor_realizado: Option<Decimal>,
    pub data: NaiveDate,
    pub responsavel: Option<String>,
    pub observacao: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarregamentoPayload {
    pub data: NaiveDate,
    pub placa_caminhao: Option<String>,
    pub documento_referencia: Option<String>,
    pub observacao: Option<String>,
}

/// Formulário completo da OS, usado tanto na criação quanto na edição.
/// Na edição, a aplicação dos campos de cadastro depende do papel do
/// usuário (ver `os_service::aplicar_edicao`).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OsPayload {
    #[validate(length(min = 1, message = "O número da OS é obrigatório."))]
    pub numero: String,
    #[validate(length(min = 1, message = "O cliente é obrigatório."))]
    pub cliente: String,
    pub fase: OsFase,
    pub status: OsStatus,
    pub empresa: Option<String>,

    pub data_emissao: NaiveDate,
    pub data_inicio: Option<NaiveDate>,
    pub data_termino: Option<NaiveDate>,
    pub data_entrega: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,

    pub tipo_contrato: Option<String>,
    #[serde(default)]
    pub valor: Decimal,

    pub tipo_loc: Option<String>,
    pub tipo_os: Option<String>,
    pub modelo: Option<String>,
    pub qtde: Option<Decimal>,
    pub largura: Option<Decimal>,
    pub comprim: Option<Decimal>,
    pub pe_direito: Option<Decimal>,
    pub piso: Option<String>,
    pub acessorios: Option<String>,
    pub observacoes: Option<String>,
    pub obs2: Option<String>,

    pub razao: Option<String>,
    pub cnpj: Option<String>,
    pub insc: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,

    pub segtrab: Option<String>,
    pub integracao: Option<String>,
    pub vendedor: Option<String>,

    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub cep: Option<String>,

    pub fat_endereco: Option<String>,
    pub fat_bairro: Option<String>,
    pub fat_cidade: Option<String>,
    pub fat_uf: Option<String>,
    pub fat_cep: Option<String>,
    pub fat_emails: Option<String>,

    pub mont_endereco: Option<String>,
    pub mont_bairro: Option<String>,
    pub mont_cidade: Option<String>,
    pub mont_uf: Option<String>,
    pub mont_cep: Option<String>,

    #[serde(default)]
    pub custos_operacionais: Vec<CustoPayload>,
    #[serde(default)]
    pub custos_visitas: Vec<CustoPayload>,
    #[serde(default)]
    pub carregamentos: Vec<CarregamentoPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DespesaPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    pub tipo: TipoDespesa,
}

#[derive(Debug, Deserialize)]
pub struct FecharRevisaoPayload {
    pub motivo: Option<String>,
}

/// Filtros da listagem de OS (query string).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsFiltro {
    pub cliente: Option<String>,
    pub fase: Option<OsFase>,
    pub tipo_os: Option<String>,
    pub empresa: Option<String>,
    pub data_ini: Option<NaiveDate>,
}
