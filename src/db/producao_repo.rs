// src/db/producao_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::producao::{
        ControleProducao, ControleProducaoPayload, OrdemProducao, OrdemProducaoPayload, Romaneio,
        RomaneioPayload,
    },
};

#[derive(Clone)]
pub struct ProducaoRepository {
    pool: PgPool,
}

impl ProducaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Próximo número da OP. Sem trava de concorrência: duas gravações
    /// simultâneas podem colidir e a UNIQUE da coluna devolve 409.
    pub async fn next_numero_sequencial<'e, E>(&self, executor: E) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(numero_sequencial) FROM ordem_producao")
                .fetch_one(executor)
                .await?;

        Ok(max.unwrap_or(0) + 1)
    }

    pub async fn insert_op<'e, E>(
        &self,
        executor: E,
        numero_sequencial: i32,
        dados: &OrdemProducaoPayload,
    ) -> Result<OrdemProducao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let op = sqlx::query_as::<_, OrdemProducao>(
            r#"
            INSERT INTO ordem_producao (
                numero_sequencial, os_id, status, departamento, cliente, codigo,
                part_number_produto, quantidade, largura, comprimento, pe_direito,
                piso, acessorios,
                data_emissao, data_inicio_previsto, data_termino_previsto,
                data_carregamento, data_fechamento,
                tipo_contrato, tipo_op, setor, observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING *
            "#,
        )
        .bind(numero_sequencial)
        .bind(dados.os_id)
        .bind(&dados.status)
        .bind(&dados.departamento)
        .bind(&dados.cliente)
        .bind(&dados.codigo)
        .bind(&dados.part_number_produto)
        .bind(dados.quantidade)
        .bind(dados.largura)
        .bind(dados.comprimento)
        .bind(dados.pe_direito)
        .bind(&dados.piso)
        .bind(&dados.acessorios)
        .bind(dados.data_emissao)
        .bind(dados.data_inicio_previsto)
        .bind(dados.data_termino_previsto)
        .bind(dados.data_carregamento)
        .bind(dados.data_fechamento)
        .bind(&dados.tipo_contrato)
        .bind(&dados.tipo_op)
        .bind(&dados.setor)
        .bind(&dados.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(op)
    }

    pub async fn update_op<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        dados: &OrdemProducaoPayload,
    ) -> Result<OrdemProducao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let op = sqlx::query_as::<_, OrdemProducao>(
            r#"
            UPDATE ordem_producao SET
                os_id = $2, status = $3, departamento = $4, cliente = $5, codigo = $6,
                part_number_produto = $7, quantidade = $8, largura = $9,
                comprimento = $10, pe_direito = $11, piso = $12, acessorios = $13,
                data_emissao = $14, data_inicio_previsto = $15,
                data_termino_previsto = $16, data_carregamento = $17,
                data_fechamento = $18,
                tipo_contrato = $19, tipo_op = $20, setor = $21, observacoes = $22
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dados.os_id)
        .bind(&dados.status)
        .bind(&dados.departamento)
        .bind(&dados.cliente)
        .bind(&dados.codigo)
        .bind(&dados.part_number_produto)
        .bind(dados.quantidade)
        .bind(dados.largura)
        .bind(dados.comprimento)
        .bind(dados.pe_direito)
        .bind(&dados.piso)
        .bind(&dados.acessorios)
        .bind(dados.data_emissao)
        .bind(dados.data_inicio_previsto)
        .bind(dados.data_termino_previsto)
        .bind(dados.data_carregamento)
        .bind(dados.data_fechamento)
        .bind(&dados.tipo_contrato)
        .bind(&dados.tipo_op)
        .bind(&dados.setor)
        .bind(&dados.observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Ordem de Produção não encontrada."))?;

        Ok(op)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrdemProducao>, AppError> {
        let op = sqlx::query_as::<_, OrdemProducao>("SELECT * FROM ordem_producao WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(op)
    }

    pub async fn get_all(&self, cliente: Option<&str>) -> Result<Vec<OrdemProducao>, AppError> {
        let ops = sqlx::query_as::<_, OrdemProducao>(
            r#"
            SELECT * FROM ordem_producao
            WHERE ($1::text IS NULL OR cliente ILIKE '%' || $1 || '%')
            ORDER BY numero_sequencial DESC
            "#,
        )
        .bind(cliente)
        .fetch_all(&self.pool)
        .await?;

        Ok(ops)
    }

    pub async fn delete_op(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM ordem_producao WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ordem de Produção não encontrada."));
        }
        Ok(())
    }

    // --- Linhas filhas (substituídas em bloco a cada edição) ---

    pub async fn delete_controles<'e, E>(&self, executor: E, op_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM controle_producao WHERE ordem_producao_id = $1")
            .bind(op_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_controle<'e, E>(
        &self,
        executor: E,
        op_id: Uuid,
        controle: &ControleProducaoPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO controle_producao (
                ordem_producao_id, turno, departamento, obs_prod, processo, maquina,
                operador, data_inicio, hora_inicio, data_pausa, motivo_pausa,
                data_termino, hora_termino, qualidade
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(op_id)
        .bind(&controle.turno)
        .bind(&controle.departamento)
        .bind(&controle.obs_prod)
        .bind(&controle.processo)
        .bind(&controle.maquina)
        .bind(&controle.operador)
        .bind(controle.data_inicio)
        .bind(controle.hora_inicio)
        .bind(controle.data_pausa)
        .bind(&controle.motivo_pausa)
        .bind(controle.data_termino)
        .bind(controle.hora_termino)
        .bind(&controle.qualidade)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_controles(&self, op_id: Uuid) -> Result<Vec<ControleProducao>, AppError> {
        let controles = sqlx::query_as::<_, ControleProducao>(
            "SELECT * FROM controle_producao WHERE ordem_producao_id = $1 ORDER BY data_inicio ASC",
        )
        .bind(op_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(controles)
    }

    pub async fn delete_romaneios<'e, E>(&self, executor: E, op_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM romaneio WHERE ordem_producao_id = $1")
            .bind(op_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_romaneio<'e, E>(
        &self,
        executor: E,
        op_id: Uuid,
        romaneio: &RomaneioPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO romaneio
                (ordem_producao_id, id_item, descricao, quantidade, materia_prima_utilizada)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(op_id)
        .bind(romaneio.id_item)
        .bind(&romaneio.descricao)
        .bind(romaneio.quantidade)
        .bind(&romaneio.materia_prima_utilizada)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_romaneios(&self, op_id: Uuid) -> Result<Vec<Romaneio>, AppError> {
        let romaneios = sqlx::query_as::<_, Romaneio>(
            "SELECT * FROM romaneio WHERE ordem_producao_id = $1 ORDER BY id_item ASC",
        )
        .bind(op_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(romaneios)
    }
}
