// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        ComprasRepository, ManutencaoRepository, OsRepository, ProducaoRepository,
        ProdutoRepository, UserRepository,
    },
    services::{
        AuthService, ComprasService, ManutencaoService, OsService, ProducaoService, ProdutoService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub os_service: OsService,
    pub producao_service: ProducaoService,
    pub manutencao_service: ManutencaoService,
    pub compras_service: ComprasService,
    pub produto_service: ProdutoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let os_repo = OsRepository::new(db_pool.clone());
        let producao_repo = ProducaoRepository::new(db_pool.clone());
        let manutencao_repo = ManutencaoRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let compras_repo = ComprasRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());
        let os_service = OsService::new(os_repo, db_pool.clone());
        let producao_service = ProducaoService::new(producao_repo, db_pool.clone());
        let manutencao_service = ManutencaoService::new(manutencao_repo, db_pool.clone());
        let compras_service = ComprasService::new(compras_repo, db_pool.clone());
        let produto_service = ProdutoService::new(produto_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            os_service,
            producao_service,
            manutencao_service,
            compras_service,
            produto_service,
        })
    }
}
