// src/services/compras_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, policy},
    db::ComprasRepository,
    models::{
        auth::{Papel, User},
        compras::{
            Fornecedor, FornecedorPayload, PedidoCompra, PedidoCompraPayload, PedidoDetalhe,
            PedidoGerado, PedidoItemPayload, PedidoStatus, SolicitacaoCompra,
            SolicitacaoCompraPayload, SolicitacaoDetalhe, SolicitacaoStatus, TipoFornecedor,
        },
    },
};

/// Limite de alçada: pedidos acima deste valor exigem papel aprovador.
pub fn limite_alcada() -> Decimal {
    Decimal::new(5_000_00, 2)
}

/// Número de exibição do pedido. A identidade de verdade é o Uuid; este
/// número existe para papel e telefone. Colisões no mesmo segundo são
/// barradas pela UNIQUE da coluna.
pub fn gerar_numero_pedido(agora: DateTime<Utc>) -> String {
    agora.format("%Y%m%d-%H%M%S").to_string()
}

pub fn calcular_total(itens: &[PedidoItemPayload]) -> Decimal {
    itens
        .iter()
        .map(|i| i.quantidade * i.valor_unitario)
        .sum()
}

#[derive(Debug, PartialEq, Eq)]
pub struct DecisaoAprovacao {
    pub status: PedidoStatus,
    pub aviso: Option<String>,
}

/// Regra de aprovação do pedido:
/// - sem pedido de aprovação, fica "Em Cotação";
/// - acima da alçada e sem papel aprovador, fica "Aguardando Aprovação";
/// - caso contrário, "Aprovado".
pub fn decidir_aprovacao(total: Decimal, papel: Papel, quer_aprovar: bool) -> DecisaoAprovacao {
    if !quer_aprovar {
        return DecisaoAprovacao {
            status: PedidoStatus::EmCotacao,
            aviso: None,
        };
    }

    if total > limite_alcada() && !policy::pode_aprovar_acima_da_alcada(papel) {
        return DecisaoAprovacao {
            status: PedidoStatus::AguardandoAprovacao,
            aviso: Some(format!(
                "O valor total de R$ {} excede sua alçada de R$ {}. O pedido aguarda aprovação da gerência.",
                total,
                limite_alcada()
            )),
        };
    }

    DecisaoAprovacao {
        status: PedidoStatus::Aprovado,
        aviso: None,
    }
}

#[derive(Clone)]
pub struct ComprasService {
    compras_repo: ComprasRepository,
    pool: PgPool,
}

impl ComprasService {
    pub fn new(compras_repo: ComprasRepository, pool: PgPool) -> Self {
        Self { compras_repo, pool }
    }

    // --- Tipos de fornecedor ---

    pub async fn criar_tipo_fornecedor(&self, descricao: &str) -> Result<TipoFornecedor, AppError> {
        self.compras_repo.insert_tipo_fornecedor(descricao).await
    }

    pub async fn listar_tipos_fornecedor(&self) -> Result<Vec<TipoFornecedor>, AppError> {
        self.compras_repo.get_tipos_fornecedor().await
    }

    /// Seed idempotente: devolve quantos tipos foram de fato inseridos.
    pub async fn seed_tipos_fornecedor(&self, descricoes: &[&str]) -> Result<usize, AppError> {
        let mut inseridos = 0;
        for descricao in descricoes {
            if self
                .compras_repo
                .insert_tipo_fornecedor_se_novo(descricao)
                .await?
            {
                inseridos += 1;
            }
        }
        Ok(inseridos)
    }

    // --- Fornecedores ---

    pub async fn criar_fornecedor(&self, payload: &FornecedorPayload) -> Result<Fornecedor, AppError> {
        self.compras_repo.insert_fornecedor(payload).await
    }

    pub async fn editar_fornecedor(
        &self,
        id: Uuid,
        payload: &FornecedorPayload,
    ) -> Result<Fornecedor, AppError> {
        self.compras_repo.update_fornecedor(id, payload).await
    }

    pub async fn detalhar_fornecedor(&self, id: Uuid) -> Result<Fornecedor, AppError> {
        self.compras_repo
            .find_fornecedor_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Fornecedor não encontrado."))
    }

    pub async fn listar_fornecedores(&self) -> Result<Vec<Fornecedor>, AppError> {
        self.compras_repo.get_fornecedores().await
    }

    pub async fn excluir_fornecedor(&self, id: Uuid, papel: Papel) -> Result<(), AppError> {
        if !policy::eh_admin(papel) {
            return Err(AppError::AccessDenied(
                "Apenas o administrador pode excluir um fornecedor.",
            ));
        }
        self.compras_repo.delete_fornecedor(id).await
    }

    // --- Solicitações de compra ---

    /// Cria a solicitação descartando linhas em branco do formulário.
    pub async fn criar_solicitacao(
        &self,
        user_id: Uuid,
        payload: &SolicitacaoCompraPayload,
    ) -> Result<SolicitacaoCompra, AppError> {
        let itens: Vec<_> = payload
            .itens
            .iter()
            .filter(|i| !i.descricao_item.trim().is_empty())
            .collect();

        if itens.is_empty() {
            return Err(AppError::BusinessRule(
                "A solicitação precisa de ao menos um item preenchido.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let solicitacao = self
            .compras_repo
            .insert_solicitacao(&mut *tx, user_id, payload.observacao.as_deref())
            .await?;

        for item in itens {
            self.compras_repo
                .insert_solicitacao_item(&mut *tx, solicitacao.id, item)
                .await?;
        }

        tx.commit().await?;
        Ok(solicitacao)
    }

    pub async fn listar_solicitacoes(
        &self,
        status: Option<SolicitacaoStatus>,
    ) -> Result<Vec<SolicitacaoCompra>, AppError> {
        self.compras_repo.get_solicitacoes(status).await
    }

    pub async fn detalhar_solicitacao(&self, id: Uuid) -> Result<SolicitacaoDetalhe, AppError> {
        let solicitacao = self
            .compras_repo
            .find_solicitacao_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Solicitação não encontrada."))?;

        let itens = self.compras_repo.get_solicitacao_itens(id).await?;

        Ok(SolicitacaoDetalhe { solicitacao, itens })
    }

    // --- Pedidos de compra ---

    /// Converte uma solicitação Pendente em pedido, aplicando a regra de
    /// alçada, e marca a solicitação como "Em Pedido". Uma transação.
    pub async fn gerar_pedido(
        &self,
        solicitacao_id: Uuid,
        payload: &PedidoCompraPayload,
        user: &User,
    ) -> Result<PedidoGerado, AppError> {
        let mut tx = self.pool.begin().await?;

        let solicitacao = self
            .compras_repo
            .find_solicitacao_by_id(&mut *tx, solicitacao_id)
            .await?
            .ok_or(AppError::NotFound("Solicitação não encontrada."))?;

        if solicitacao.status != SolicitacaoStatus::Pendente {
            return Err(AppError::BusinessRule(
                "Esta solicitação já foi convertida em pedido.".to_string(),
            ));
        }

        let total = calcular_total(&payload.itens);
        let agora = Utc::now();
        let numero_pedido = gerar_numero_pedido(agora);

        let decisao = decidir_aprovacao(total, user.papel, payload.aprovar);

        // Campos de aprovador preenchidos se e somente se Aprovado.
        let (aprovado_por_id, data_aprovacao) = match decisao.status {
            PedidoStatus::Aprovado => (Some(user.id), Some(agora)),
            _ => (None, None),
        };

        let pedido = self
            .compras_repo
            .insert_pedido(
                &mut *tx,
                &numero_pedido,
                solicitacao.id,
                payload.fornecedor_id,
                &payload.condicao_pagamento,
                payload.prazo_entrega.as_deref(),
                payload.observacoes.as_deref(),
                total,
                decisao.status,
                aprovado_por_id,
                data_aprovacao,
            )
            .await?;

        let mut itens = Vec::with_capacity(payload.itens.len());
        for item in &payload.itens {
            let subtotal = item.quantidade * item.valor_unitario;
            let linha = self
                .compras_repo
                .insert_pedido_item(
                    &mut *tx,
                    pedido.id,
                    &item.descricao,
                    item.quantidade,
                    item.unidade.as_deref(),
                    item.valor_unitario,
                    subtotal,
                )
                .await?;
            itens.push(linha);
        }

        self.compras_repo
            .update_solicitacao_status(&mut *tx, solicitacao.id, SolicitacaoStatus::EmPedido)
            .await?;

        tx.commit().await?;

        tracing::info!(
            numero = %pedido.numero_pedido,
            status = ?pedido.status,
            total = %pedido.valor_total,
            "pedido de compra gerado"
        );

        Ok(PedidoGerado {
            pedido,
            itens,
            aviso: decisao.aviso,
        })
    }

    pub async fn listar_pedidos(&self) -> Result<Vec<PedidoCompra>, AppError> {
        self.compras_repo.get_pedidos().await
    }

    pub async fn detalhar_pedido(&self, id: Uuid) -> Result<PedidoDetalhe, AppError> {
        let pedido = self
            .compras_repo
            .find_pedido_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido não encontrado."))?;

        let itens = self.compras_repo.get_pedido_itens(id).await?;

        Ok(PedidoDetalhe { pedido, itens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn item(descricao: &str, quantidade: Decimal, valor_unitario: Decimal) -> PedidoItemPayload {
        PedidoItemPayload {
            produto_id: None,
            descricao: descricao.into(),
            quantidade,
            unidade: Some("UN".into()),
            valor_unitario,
        }
    }

    #[test]
    fn total_soma_quantidade_vezes_unitario() {
        // 10 × 100,00 + 1 × 4800,00 = 5800,00
        let itens = vec![
            item("Parafuso sextavado", dec!(10), dec!(100.00)),
            item("Motor elétrico", dec!(1), dec!(4800.00)),
        ];
        assert_eq!(calcular_total(&itens), dec!(5800.00));
    }

    #[test]
    fn acima_da_alcada_gerente_aprova_direto() {
        let decisao = decidir_aprovacao(dec!(5800.00), Papel::Gerente, true);
        assert_eq!(decisao.status, PedidoStatus::Aprovado);
        assert!(decisao.aviso.is_none());
    }

    #[test]
    fn acima_da_alcada_operador_fica_aguardando() {
        let decisao = decidir_aprovacao(dec!(5800.00), Papel::Operador, true);
        assert_eq!(decisao.status, PedidoStatus::AguardandoAprovacao);
        assert!(decisao.aviso.is_some());
    }

    #[test]
    fn acima_da_alcada_compras_tambem_fica_aguardando() {
        let decisao = decidir_aprovacao(dec!(12500.00), Papel::Compras, true);
        assert_eq!(decisao.status, PedidoStatus::AguardandoAprovacao);
    }

    #[test]
    fn dentro_da_alcada_qualquer_papel_aprova() {
        let decisao = decidir_aprovacao(dec!(4999.99), Papel::Operador, true);
        assert_eq!(decisao.status, PedidoStatus::Aprovado);
        assert!(decisao.aviso.is_none());
    }

    #[test]
    fn limite_exato_nao_exige_alcada() {
        // A regra é estritamente "acima de" 5000,00
        let decisao = decidir_aprovacao(dec!(5000.00), Papel::Operador, true);
        assert_eq!(decisao.status, PedidoStatus::Aprovado);
    }

    #[test]
    fn sem_pedir_aprovacao_fica_em_cotacao() {
        let decisao = decidir_aprovacao(dec!(100000.00), Papel::Operador, false);
        assert_eq!(decisao.status, PedidoStatus::EmCotacao);
        assert!(decisao.aviso.is_none());

        // Mesmo quem tem alçada salva apenas a cotação
        let decisao = decidir_aprovacao(dec!(100000.00), Papel::Admin, false);
        assert_eq!(decisao.status, PedidoStatus::EmCotacao);
    }

    #[test]
    fn numero_do_pedido_e_o_timestamp_de_geracao() {
        let agora = Utc.with_ymd_and_hms(2025, 8, 24, 15, 30, 0).unwrap();
        assert_eq!(gerar_numero_pedido(agora), "20250824-153000");
    }
}
