// src/db/compras_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::compras::{
        Fornecedor, FornecedorPayload, PedidoCompra, PedidoItem, PedidoStatus, SolicitacaoCompra,
        SolicitacaoItem, SolicitacaoItemPayload, SolicitacaoStatus, TipoFornecedor,
    },
};

#[derive(Clone)]
pub struct ComprasRepository {
    pool: PgPool,
}

impl ComprasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TIPOS DE FORNECEDOR
    // =========================================================================

    pub async fn insert_tipo_fornecedor(&self, descricao: &str) -> Result<TipoFornecedor, AppError> {
        let tipo = sqlx::query_as::<_, TipoFornecedor>(
            "INSERT INTO tipo_fornecedor (descricao) VALUES ($1) RETURNING *",
        )
        .bind(descricao)
        .fetch_one(&self.pool)
        .await?;

        Ok(tipo)
    }

    /// Insere ignorando duplicatas. Usado pelo seed da linha de comando.
    pub async fn insert_tipo_fornecedor_se_novo(&self, descricao: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO tipo_fornecedor (descricao) VALUES ($1) ON CONFLICT (descricao) DO NOTHING",
        )
        .bind(descricao)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_tipos_fornecedor(&self) -> Result<Vec<TipoFornecedor>, AppError> {
        let tipos = sqlx::query_as::<_, TipoFornecedor>(
            "SELECT * FROM tipo_fornecedor ORDER BY descricao ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tipos)
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

    pub async fn insert_fornecedor(&self, dados: &FornecedorPayload) -> Result<Fornecedor, AppError> {
        let fornecedor = sqlx::query_as::<_, Fornecedor>(
            r#"
            INSERT INTO fornecedor (
                cod_sap, razao_social, nome_fantasia, tipo_fornecedor_id, documento,
                inscricao_estadual, email, telefone,
                endereco, bairro, cep, cidade, uf, pais
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&dados.cod_sap)
        .bind(&dados.razao_social)
        .bind(&dados.nome_fantasia)
        .bind(dados.tipo_fornecedor_id)
        .bind(&dados.documento)
        .bind(&dados.inscricao_estadual)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(&dados.endereco)
        .bind(&dados.bairro)
        .bind(&dados.cep)
        .bind(&dados.cidade)
        .bind(&dados.uf)
        .bind(&dados.pais)
        .fetch_one(&self.pool)
        .await?;

        Ok(fornecedor)
    }

    pub async fn update_fornecedor(
        &self,
        id: Uuid,
        dados: &FornecedorPayload,
    ) -> Result<Fornecedor, AppError> {
        let fornecedor = sqlx::query_as::<_, Fornecedor>(
            r#"
            UPDATE fornecedor SET
                cod_sap = $2, razao_social = $3, nome_fantasia = $4,
                tipo_fornecedor_id = $5, documento = $6, inscricao_estadual = $7,
                email = $8, telefone = $9,
                endereco = $10, bairro = $11, cep = $12, cidade = $13, uf = $14, pais = $15
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.cod_sap)
        .bind(&dados.razao_social)
        .bind(&dados.nome_fantasia)
        .bind(dados.tipo_fornecedor_id)
        .bind(&dados.documento)
        .bind(&dados.inscricao_estadual)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(&dados.endereco)
        .bind(&dados.bairro)
        .bind(&dados.cep)
        .bind(&dados.cidade)
        .bind(&dados.uf)
        .bind(&dados.pais)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Fornecedor não encontrado."))?;

        Ok(fornecedor)
    }

    pub async fn find_fornecedor_by_id(&self, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
        let fornecedor = sqlx::query_as::<_, Fornecedor>("SELECT * FROM fornecedor WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(fornecedor)
    }

    pub async fn get_fornecedores(&self) -> Result<Vec<Fornecedor>, AppError> {
        let fornecedores =
            sqlx::query_as::<_, Fornecedor>("SELECT * FROM fornecedor ORDER BY razao_social ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(fornecedores)
    }

    pub async fn delete_fornecedor(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fornecedor WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Fornecedor não encontrado."));
        }
        Ok(())
    }

    // =========================================================================
    //  SOLICITAÇÕES DE COMPRA
    // =========================================================================

    pub async fn insert_solicitacao<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        observacao: Option<&str>,
    ) -> Result<SolicitacaoCompra, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitacao = sqlx::query_as::<_, SolicitacaoCompra>(
            r#"
            INSERT INTO solicitacao_compra (user_id, observacao)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(observacao)
        .fetch_one(executor)
        .await?;

        Ok(solicitacao)
    }

    pub async fn insert_solicitacao_item<'e, E>(
        &self,
        executor: E,
        solicitacao_id: Uuid,
        item: &SolicitacaoItemPayload,
    ) -> Result<SolicitacaoItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linha = sqlx::query_as::<_, SolicitacaoItem>(
            r#"
            INSERT INTO solicitacao_item
                (solicitacao_id, produto_id, descricao_item, quantidade, unidade, prioridade)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(solicitacao_id)
        .bind(item.produto_id)
        .bind(&item.descricao_item)
        .bind(item.quantidade)
        .bind(&item.unidade)
        .bind(&item.prioridade)
        .fetch_one(executor)
        .await?;

        Ok(linha)
    }

    pub async fn find_solicitacao_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SolicitacaoCompra>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let solicitacao =
            sqlx::query_as::<_, SolicitacaoCompra>("SELECT * FROM solicitacao_compra WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(solicitacao)
    }

    pub async fn get_solicitacoes(
        &self,
        status: Option<SolicitacaoStatus>,
    ) -> Result<Vec<SolicitacaoCompra>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoCompra>(
            r#"
            SELECT * FROM solicitacao_compra
            WHERE ($1::solicitacao_status IS NULL OR status = $1)
            ORDER BY data_criacao DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(solicitacoes)
    }

    pub async fn get_solicitacao_itens(
        &self,
        solicitacao_id: Uuid,
    ) -> Result<Vec<SolicitacaoItem>, AppError> {
        let itens = sqlx::query_as::<_, SolicitacaoItem>(
            "SELECT * FROM solicitacao_item WHERE solicitacao_id = $1 ORDER BY descricao_item ASC",
        )
        .bind(solicitacao_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(itens)
    }

    pub async fn update_solicitacao_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: SolicitacaoStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE solicitacao_compra SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  PEDIDOS DE COMPRA
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_pedido<'e, E>(
        &self,
        executor: E,
        numero_pedido: &str,
        solicitacao_origem_id: Uuid,
        fornecedor_id: Uuid,
        condicao_pagamento: &str,
        prazo_entrega: Option<&str>,
        observacoes: Option<&str>,
        valor_total: Decimal,
        status: PedidoStatus,
        aprovado_por_id: Option<Uuid>,
        data_aprovacao: Option<DateTime<Utc>>,
    ) -> Result<PedidoCompra, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pedido = sqlx::query_as::<_, PedidoCompra>(
            r#"
            INSERT INTO pedido_compra (
                numero_pedido, solicitacao_origem_id, fornecedor_id,
                condicao_pagamento, prazo_entrega, observacoes,
                valor_total, status, aprovado_por_id, data_aprovacao
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(numero_pedido)
        .bind(solicitacao_origem_id)
        .bind(fornecedor_id)
        .bind(condicao_pagamento)
        .bind(prazo_entrega)
        .bind(observacoes)
        .bind(valor_total)
        .bind(status)
        .bind(aprovado_por_id)
        .bind(data_aprovacao)
        .fetch_one(executor)
        .await?;

        Ok(pedido)
    }

    pub async fn insert_pedido_item<'e, E>(
        &self,
        executor: E,
        pedido_id: Uuid,
        descricao: &str,
        quantidade: Decimal,
        unidade: Option<&str>,
        valor_unitario: Decimal,
        valor_total_item: Decimal,
    ) -> Result<PedidoItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PedidoItem>(
            r#"
            INSERT INTO pedido_item
                (pedido_id, descricao, quantidade, unidade, valor_unitario, valor_total_item)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(pedido_id)
        .bind(descricao)
        .bind(quantidade)
        .bind(unidade)
        .bind(valor_unitario)
        .bind(valor_total_item)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn get_pedidos(&self) -> Result<Vec<PedidoCompra>, AppError> {
        let pedidos = sqlx::query_as::<_, PedidoCompra>(
            "SELECT * FROM pedido_compra ORDER BY data_criacao DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pedidos)
    }

    pub async fn find_pedido_by_id(&self, id: Uuid) -> Result<Option<PedidoCompra>, AppError> {
        let pedido = sqlx::query_as::<_, PedidoCompra>("SELECT * FROM pedido_compra WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pedido)
    }

    pub async fn get_pedido_itens(&self, pedido_id: Uuid) -> Result<Vec<PedidoItem>, AppError> {
        let itens = sqlx::query_as::<_, PedidoItem>(
            "SELECT * FROM pedido_item WHERE pedido_id = $1 ORDER BY descricao ASC",
        )
        .bind(pedido_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(itens)
    }
}
