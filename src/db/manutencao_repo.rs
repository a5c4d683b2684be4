// src/db/manutencao_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::manutencao::{ManutApont, ManutApontPayload, OsManutencao, OsManutencaoPayload},
};

#[derive(Clone)]
pub struct ManutencaoRepository {
    pool: PgPool,
}

impl ManutencaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Maior número já usado, considerando apenas os puramente numéricos
    /// (números antigos importados podem carregar sufixos).
    pub async fn max_numero<'e, E>(&self, executor: E) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (max,): (Option<i64>,) = sqlx::query_as(
            r#"SELECT MAX(numero::bigint) FROM os_manutencao WHERE numero ~ '^[0-9]+$'"#,
        )
        .fetch_one(executor)
        .await?;

        Ok(max)
    }

    pub async fn insert_os<'e, E>(
        &self,
        executor: E,
        numero: &str,
        dados: &OsManutencaoPayload,
    ) -> Result<OsManutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let os = sqlx::query_as::<_, OsManutencao>(
            r#"
            INSERT INTO os_manutencao (
                numero, data_abertura, hora_abert, data_encerramento,
                solicitante, area_setor, maq_equip, ocorrencia, parada,
                manut_corretiva, manut_preventiva, manut_preditiva,
                inspecao, melhorias, predial, outro,
                sintoma, causa, intervencao,
                materiais_utilizados, materiais_comprados,
                ficha_tec, obs_manut, assinatura1, assinatura2
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING *
            "#,
        )
        .bind(numero)
        .bind(dados.data_abertura)
        .bind(dados.hora_abert)
        .bind(dados.data_encerramento)
        .bind(&dados.solicitante)
        .bind(&dados.area_setor)
        .bind(&dados.maq_equip)
        .bind(&dados.ocorrencia)
        .bind(&dados.parada)
        .bind(dados.manut_corretiva)
        .bind(dados.manut_preventiva)
        .bind(dados.manut_preditiva)
        .bind(dados.inspecao)
        .bind(dados.melhorias)
        .bind(dados.predial)
        .bind(dados.outro)
        .bind(&dados.sintoma)
        .bind(&dados.causa)
        .bind(&dados.intervencao)
        .bind(&dados.materiais_utilizados)
        .bind(&dados.materiais_comprados)
        .bind(&dados.ficha_tec)
        .bind(&dados.obs_manut)
        .bind(&dados.assinatura1)
        .bind(&dados.assinatura2)
        .fetch_one(executor)
        .await?;

        Ok(os)
    }

    pub async fn update_os<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        dados: &OsManutencaoPayload,
    ) -> Result<OsManutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let os = sqlx::query_as::<_, OsManutencao>(
            r#"
            UPDATE os_manutencao SET
                data_abertura = $2, hora_abert = $3, data_encerramento = $4,
                solicitante = $5, area_setor = $6, maq_equip = $7,
                ocorrencia = $8, parada = $9,
                manut_corretiva = $10, manut_preventiva = $11, manut_preditiva = $12,
                inspecao = $13, melhorias = $14, predial = $15, outro = $16,
                sintoma = $17, causa = $18, intervencao = $19,
                materiais_utilizados = $20, materiais_comprados = $21,
                ficha_tec = $22, obs_manut = $23, assinatura1 = $24, assinatura2 = $25
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dados.data_abertura)
        .bind(dados.hora_abert)
        .bind(dados.data_encerramento)
        .bind(&dados.solicitante)
        .bind(&dados.area_setor)
        .bind(&dados.maq_equip)
        .bind(&dados.ocorrencia)
        .bind(&dados.parada)
        .bind(dados.manut_corretiva)
        .bind(dados.manut_preventiva)
        .bind(dados.manut_preditiva)
        .bind(dados.inspecao)
        .bind(dados.melhorias)
        .bind(dados.predial)
        .bind(dados.outro)
        .bind(&dados.sintoma)
        .bind(&dados.causa)
        .bind(&dados.intervencao)
        .bind(&dados.materiais_utilizados)
        .bind(&dados.materiais_comprados)
        .bind(&dados.ficha_tec)
        .bind(&dados.obs_manut)
        .bind(&dados.assinatura1)
        .bind(&dados.assinatura2)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("OS de Manutenção não encontrada."))?;

        Ok(os)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OsManutencao>, AppError> {
        let os = sqlx::query_as::<_, OsManutencao>("SELECT * FROM os_manutencao WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(os)
    }

    pub async fn get_all(&self) -> Result<Vec<OsManutencao>, AppError> {
        let lista = sqlx::query_as::<_, OsManutencao>(
            "SELECT * FROM os_manutencao ORDER BY data_abertura DESC, numero DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lista)
    }

    pub async fn delete_os(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM os_manutencao WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("OS de Manutenção não encontrada."));
        }
        Ok(())
    }

    // --- Apontamentos ---

    pub async fn delete_apontamentos<'e, E>(&self, executor: E, os_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM manut_apont WHERE os_manutencao_id = $1")
            .bind(os_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_apontamento<'e, E>(
        &self,
        executor: E,
        os_id: Uuid,
        apont: &ManutApontPayload,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO manut_apont
                (os_manutencao_id, manutentor, data_inicio, hora_inicio, data_termino, hora_termino)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(os_id)
        .bind(&apont.manutentor)
        .bind(apont.data_inicio)
        .bind(apont.hora_inicio)
        .bind(apont.data_termino)
        .bind(apont.hora_termino)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_apontamentos(&self, os_id: Uuid) -> Result<Vec<ManutApont>, AppError> {
        let apontamentos = sqlx::query_as::<_, ManutApont>(
            "SELECT * FROM manut_apont WHERE os_manutencao_id = $1 ORDER BY data_inicio ASC",
        )
        .bind(os_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(apontamentos)
    }
}
