// src/db/produto_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::produto::{Produto, ProdutoPayload},
};

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, dados: &ProdutoPayload) -> Result<Produto, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produto (part_number, sku, descricao, tipo_de_material, custo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&dados.part_number)
        .bind(&dados.sku)
        .bind(&dados.descricao)
        .bind(&dados.tipo_de_material)
        .bind(dados.custo)
        .fetch_one(executor)
        .await?;

        Ok(produto)
    }

    pub async fn update(&self, id: Uuid, dados: &ProdutoPayload) -> Result<Produto, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produto
            SET part_number = $2, sku = $3, descricao = $4, tipo_de_material = $5, custo = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.part_number)
        .bind(&dados.sku)
        .bind(&dados.descricao)
        .bind(&dados.tipo_de_material)
        .bind(dados.custo)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Produto não encontrado."))?;

        Ok(produto)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produto WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(produto)
    }

    pub async fn find_by_part_number(&self, part_number: &str) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produto WHERE part_number = $1")
            .bind(part_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(produto)
    }

    pub async fn get_all(&self) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>("SELECT * FROM produto ORDER BY part_number ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(produtos)
    }

    /// Busca para autocomplete: limita em 50 para não devolver o catálogo inteiro.
    pub async fn search(&self, termo: &str) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>(
            r#"
            SELECT * FROM produto
            WHERE part_number ILIKE '%' || $1 || '%'
               OR sku ILIKE '%' || $1 || '%'
               OR descricao ILIKE '%' || $1 || '%'
            ORDER BY part_number ASC
            LIMIT 50
            "#,
        )
        .bind(termo)
        .fetch_all(&self.pool)
        .await?;

        Ok(produtos)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM produto WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Produto não encontrado."));
        }
        Ok(())
    }

    /// Usado pela importação de CSV, que substitui o catálogo por completo.
    pub async fn delete_all<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM produto").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
