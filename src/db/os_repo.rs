// src/db/os_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::os::{
        Carregamento, CarregamentoPayload, CustoDetalhe, CustoPayload, Despesa, Os, OsFiltro,
        OsPayload, OsVersao, TipoDespesa,
    },
};

#[derive(Clone)]
pub struct OsRepository {
    pool: PgPool,
}

impl OsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CABEÇALHO DA OS
    // =========================================================================

    pub async fn insert_os<'e, E>(&self, executor: E, dados: &OsPayload) -> Result<Os, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let os = sqlx::query_as::<_, Os>(
            r#"
            INSERT INTO os (
                numero, cliente, fase, status, empresa,
                data_emissao, data_inicio, data_termino, data_entrega, data_conclusao,
                tipo_contrato, valor,
                tipo_loc, tipo_os, modelo, qtde, largura, comprim, pe_direito, piso,
                acessorios, observacoes, obs2,
                razao, cnpj, insc, email, telefone,
                segtrab, integracao, vendedor,
                endereco, bairro, cidade, uf, cep,
                fat_endereco, fat_bairro, fat_cidade, fat_uf, fat_cep, fat_emails,
                mont_endereco, mont_bairro, mont_cidade, mont_uf, mont_cep
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23,
                $24, $25, $26, $27, $28,
                $29, $30, $31,
                $32, $33, $34, $35, $36,
                $37, $38, $39, $40, $41, $42,
                $43, $44, $45, $46, $47
            )
            RETURNING *
            "#,
        )
        .bind(&dados.numero)
        .bind(&dados.cliente)
        .bind(dados.fase)
        .bind(dados.status)
        .bind(&dados.empresa)
        .bind(dados.data_emissao)
        .bind(dados.data_inicio)
        .bind(dados.data_termino)
        .bind(dados.data_entrega)
        .bind(dados.data_conclusao)
        .bind(&dados.tipo_contrato)
        .bind(dados.valor)
        .bind(&dados.tipo_loc)
        .bind(&dados.tipo_os)
        .bind(&dados.modelo)
        .bind(dados.qtde)
        .bind(dados.largura)
        .bind(dados.comprim)
        .bind(dados.pe_direito)
        .bind(&dados.piso)
        .bind(&dados.acessorios)
        .bind(&dados.observacoes)
        .bind(&dados.obs2)
        .bind(&dados.razao)
        .bind(&dados.cnpj)
        .bind(&dados.insc)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(&dados.segtrab)
        .bind(&dados.integracao)
        .bind(&dados.vendedor)
        .bind(&dados.endereco)
        .bind(&dados.bairro)
        .bind(&dados.cidade)
        .bind(&dados.uf)
        .bind(&dados.cep)
        .bind(&dados.fat_endereco)
        .bind(&dados.fat_bairro)
        .bind(&dados.fat_cidade)
        .bind(&dados.fat_uf)
        .bind(&dados.fat_cep)
        .bind(&dados.fat_emails)
        .bind(&dados.mont_endereco)
        .bind(&dados.mont_bairro)
        .bind(&dados.mont_cidade)
        .bind(&dados.mont_uf)
        .bind(&dados.mont_cep)
        .fetch_one(executor)
        .await?;

        Ok(os)
    }

    /// Persiste o cabeçalho já mutado pelo serviço (a política de campos
    /// é aplicada antes, em memória).
    pub async fn update_os<'e, E>(&self, executor: E, os: &Os) -> Result<Os, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let atualizada = sqlx::query_as::<_, Os>(
            r#"
            UPDATE os SET
                numero = $2, cliente = $3, fase = $4, status = $5, empresa = $6,
                data_emissao = $7, data_inicio = $8, data_termino = $9,
                data_entrega = $10, data_conclusao = $11,
                tipo_contrato = $12, valor = $13,
                tipo_loc = $14, tipo_os = $15, modelo = $16, qtde = $17,
                largura = $18, comprim = $19, pe_direito = $20, piso = $21,
                acessorios = $22, observacoes = $23, obs2 = $24,
                razao = $25, cnpj = $26, insc = $27, email = $28, telefone = $29,
                segtrab = $30, integracao = $31, vendedor = $32,
                endereco = $33, bairro = $34, cidade = $35, uf = $36, cep = $37,
                fat_endereco = $38, fat_bairro = $39, fat_cidade = $40,
                fat_uf = $41, fat_cep = $42, fat_emails = $43,
                mont_endereco = $44, mont_bairro = $45, mont_cidade = $46,
                mont_uf = $47, mont_cep = $48
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(os.id)
        .bind(&os.numero)
        .bind(&os.cliente)
        .bind(os.fase)
        .bind(os.status)
        .bind(&os.empresa)
        .bind(os.data_emissao)
        .bind(os.data_inicio)
        .bind(os.data_termino)
        .bind(os.data_entrega)
        .bind(os.data_conclusao)
        .bind(&os.tipo_contrato)
        .bind(os.valor)
        .bind(&os.tipo_loc)
        .bind(&os.tipo_os)
        .bind(&os.modelo)
        .bind(os.qtde)
        .bind(os.largura)
        .bind(os.comprim)
        .bind(os.pe_direito)
        .bind(&os.piso)
        .bind(&os.acessorios)
        .bind(&os.observacoes)
        .bind(&os.obs2)
        .bind(&os.razao)
        .bind(&os.cnpj)
        .bind(&os.insc)
        .bind(&os.email)
        .bind(&os.telefone)
        .bind(&os.segtrab)
        .bind(&os.integracao)
        .bind(&os.vendedor)
        .bind(&os.endereco)
        .bind(&os.bairro)
        .bind(&os.cidade)
        .bind(&os.uf)
        .bind(&os.cep)
        .bind(&os.fat_endereco)
        .bind(&os.fat_bairro)
        .bind(&os.fat_cidade)
        .bind(&os.fat_uf)
        .bind(&os.fat_cep)
        .bind(&os.fat_emails)
        .bind(&os.mont_endereco)
        .bind(&os.mont_bairro)
        .bind(&os.mont_cidade)
        .bind(&os.mont_uf)
        .bind(&os.mont_cep)
        .fetch_one(executor)
        .await?;

        Ok(atualizada)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Os>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let os = sqlx::query_as::<_, Os>("SELECT * FROM os WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(os)
    }

    pub async fn get_all(&self, filtro: &OsFiltro) -> Result<Vec<Os>, AppError> {
        // Filtros opcionais: parâmetro nulo não restringe.
        let lista = sqlx::query_as::<_, Os>(
            r#"
            SELECT * FROM os
            WHERE ($1::text IS NULL OR cliente ILIKE '%' || $1 || '%')
              AND ($2::os_fase IS NULL OR fase = $2)
              AND ($3::text IS NULL OR tipo_os = $3)
              AND ($4::text IS NULL OR empresa = $4)
              AND ($5::date IS NULL OR data_emissao >= $5)
            ORDER BY data_criacao DESC
            "#,
        )
        .bind(&filtro.cliente)
        .bind(filtro.fase)
        .bind(&filtro.tipo_os)
        .bind(&filtro.empresa)
        .bind(filtro.data_ini)
        .fetch_all(&self.pool)
        .await?;

        Ok(lista)
    }

    // =========================================================================
    //  CUSTOS E CARREGAMENTOS
    // =========================================================================

    pub async fn delete_custos<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        tipo: TipoDespesa,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match tipo {
            TipoDespesa::Operacional => "DELETE FROM custo_operacional WHERE os_id = $1",
            TipoDespesa::Visita => "DELETE FROM custo_visita WHERE os_id = $1",
        };
        sqlx::query(sql).bind(os_id).execute(executor).await?;
        Ok(())
    }

    pub async fn insert_custo<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        tipo: TipoDespesa,
        custo: &CustoPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match tipo {
            TipoDespesa::Operacional => {
                r#"
                INSERT INTO custo_operacional
                    (os_id, despesa_id, valor, valor_realizado, data, observacao, responsavel)
                VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'Reconlog'))
                "#
            }
            TipoDespesa::Visita => {
                r#"
                INSERT INTO custo_visita
                    (os_id, despesa_id, valor, valor_realizado, data, observacao, responsavel)
                VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'Reconlog'))
                "#
            }
        };
        sqlx::query(sql)
            .bind(os_id)
            .bind(custo.despesa_id)
            .bind(custo.valor)
            .bind(custo.valor_realizado)
            .bind(custo.data)
            .bind(&custo.observacao)
            .bind(&custo.responsavel)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn get_custos<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        tipo: TipoDespesa,
    ) -> Result<Vec<CustoDetalhe>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match tipo {
            TipoDespesa::Operacional => {
                r#"
                SELECT c.id, c.os_id, c.despesa_id, d.descricao AS despesa_descricao,
                       c.valor, c.valor_realizado, c.data, c.observacao, c.responsavel
                FROM custo_operacional c
                JOIN despesa d ON d.id = c.despesa_id
                WHERE c.os_id = $1
                ORDER BY c.data ASC
                "#
            }
            TipoDespesa::Visita => {
                r#"
                SELECT c.id, c.os_id, c.despesa_id, d.descricao AS despesa_descricao,
                       c.valor, c.valor_realizado, c.data, c.observacao, c.responsavel
                FROM custo_visita c
                JOIN despesa d ON d.id = c.despesa_id
                WHERE c.os_id = $1
                ORDER BY c.data ASC
                "#
            }
        };
        let custos = sqlx::query_as::<_, CustoDetalhe>(sql)
            .bind(os_id)
            .fetch_all(executor)
            .await?;

        Ok(custos)
    }

    pub async fn delete_carregamentos<'e, E>(&self, executor: E, os_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM carregamento WHERE os_id = $1")
            .bind(os_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_carregamento<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        carga: &CarregamentoPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO carregamento (os_id, data, placa_caminhao, documento_referencia, observacao)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(os_id)
        .bind(carga.data)
        .bind(&carga.placa_caminhao)
        .bind(&carga.documento_referencia)
        .bind(&carga.observacao)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_carregamentos<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
    ) -> Result<Vec<Carregamento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cargas = sqlx::query_as::<_, Carregamento>(
            "SELECT * FROM carregamento WHERE os_id = $1 ORDER BY data ASC",
        )
        .bind(os_id)
        .fetch_all(executor)
        .await?;

        Ok(cargas)
    }

    // =========================================================================
    //  VERSÕES (SNAPSHOTS)
    // =========================================================================

    pub async fn insert_versao<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        numero_revisao: i32,
        usuario_responsavel: &str,
        motivo: &str,
        dados_snapshot: &str,
    ) -> Result<OsVersao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let versao = sqlx::query_as::<_, OsVersao>(
            r#"
            INSERT INTO os_versao
                (os_id, numero_revisao, usuario_responsavel, motivo, dados_snapshot)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(os_id)
        .bind(numero_revisao)
        .bind(usuario_responsavel)
        .bind(motivo)
        .bind(dados_snapshot)
        .fetch_one(executor)
        .await?;

        Ok(versao)
    }

    pub async fn increment_revisao<'e, E>(&self, executor: E, os_id: Uuid) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (revisao,): (i32,) =
            sqlx::query_as("UPDATE os SET revisao = revisao + 1 WHERE id = $1 RETURNING revisao")
                .bind(os_id)
                .fetch_one(executor)
                .await?;

        Ok(revisao)
    }

    pub async fn get_versoes(&self, os_id: Uuid) -> Result<Vec<OsVersao>, AppError> {
        let versoes = sqlx::query_as::<_, OsVersao>(
            "SELECT * FROM os_versao WHERE os_id = $1 ORDER BY numero_revisao DESC",
        )
        .bind(os_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(versoes)
    }

    // =========================================================================
    //  DESPESAS (tabela de consulta)
    // =========================================================================

    pub async fn insert_despesa(
        &self,
        descricao: &str,
        tipo: TipoDespesa,
    ) -> Result<Despesa, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>(
            "INSERT INTO despesa (descricao, tipo) VALUES ($1, $2) RETURNING *",
        )
        .bind(descricao)
        .bind(tipo)
        .fetch_one(&self.pool)
        .await?;

        Ok(despesa)
    }

    pub async fn find_despesa_por_descricao(
        &self,
        descricao: &str,
    ) -> Result<Option<Despesa>, AppError> {
        // Checagem de duplicidade sem diferenciar maiúsculas/minúsculas.
        let despesa = sqlx::query_as::<_, Despesa>("SELECT * FROM despesa WHERE descricao ILIKE $1")
            .bind(descricao)
            .fetch_optional(&self.pool)
            .await?;

        Ok(despesa)
    }

    pub async fn get_all_despesas(&self) -> Result<Vec<Despesa>, AppError> {
        let despesas =
            sqlx::query_as::<_, Despesa>("SELECT * FROM despesa ORDER BY tipo, descricao")
                .fetch_all(&self.pool)
                .await?;

        Ok(despesas)
    }
}
