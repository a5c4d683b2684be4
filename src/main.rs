//src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;
use crate::models::auth::Papel;

// Tipos de fornecedor padrão da operação (seed idempotente)
const TIPOS_FORNECEDOR_PADRAO: &[&str] = &[
    "Matéria-Prima",
    "Material de Consumo",
    "Material de Escritório",
    "Material de Limpeza",
    "Material Elétrico",
    "Material Hidráulico",
    "EPI / Segurança",
    "Ferramentas",
    "Serviços de Manutenção",
    "Serviços de Transporte / Frete",
    "Serviços Gerais",
    "Locação de Equipamentos",
    "Tecnologia / Informática",
    "Outros",
];

#[derive(Parser)]
#[command(name = "controle-producao", about = "Backend do controle de produção")]
struct Cli {
    #[command(subcommand)]
    comando: Option<Comando>,
}

#[derive(Subcommand)]
enum Comando {
    /// Sobe o servidor HTTP (padrão quando nenhum comando é passado)
    Serve,
    /// Cria o usuário administrador inicial, se ainda não existir
    CreateAdmin,
    /// Insere os tipos de fornecedor padrão, ignorando os já existentes
    SeedTipos,
    /// Substitui o catálogo de produtos pelo conteúdo de um CSV
    ImportProducts { arquivo: PathBuf },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let cli = Cli::parse();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    match cli.comando.unwrap_or(Comando::Serve) {
        Comando::Serve => servir(app_state).await,
        Comando::CreateAdmin => criar_admin(app_state).await,
        Comando::SeedTipos => seed_tipos(app_state).await,
        Comando::ImportProducts { arquivo } => importar_produtos(app_state, &arquivo).await,
    }
}

async fn criar_admin(app_state: AppState) {
    let resultado = app_state
        .auth_service
        .create_user("admin", "admin", Papel::Admin)
        .await;

    match resultado {
        Ok(user) => tracing::info!("✅ Usuário '{}' criado. Troque a senha padrão!", user.username),
        Err(common::error::AppError::UniqueViolation(_)) => {
            tracing::info!("Usuário 'admin' já existe, nada a fazer.")
        }
        Err(e) => {
            tracing::error!("Falha ao criar o admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn seed_tipos(app_state: AppState) {
    match app_state
        .compras_service
        .seed_tipos_fornecedor(TIPOS_FORNECEDOR_PADRAO)
        .await
    {
        Ok(inseridos) => tracing::info!(
            "✅ Seed concluído: {} de {} tipos inseridos.",
            inseridos,
            TIPOS_FORNECEDOR_PADRAO.len()
        ),
        Err(e) => {
            tracing::error!("Falha no seed de tipos de fornecedor: {}", e);
            std::process::exit(1);
        }
    }
}

async fn importar_produtos(app_state: AppState, arquivo: &std::path::Path) {
    match app_state.produto_service.importar_csv(arquivo).await {
        Ok(resumo) => tracing::info!(
            "✅ Importação concluída: {} produtos (ignorados: {}, removidos: {}).",
            resumo.importados,
            resumo.ignorados,
            resumo.removidos
        ),
        Err(e) => {
            tracing::error!("Falha na importação de produtos: {}", e);
            std::process::exit(1);
        }
    }
}

async fn servir(app_state: AppState) {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Tudo abaixo exige Bearer token
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/usuarios",
            get(handlers::usuarios::listar).post(handlers::usuarios::criar),
        )
        .route(
            "/usuarios/{id}",
            put(handlers::usuarios::editar).delete(handlers::usuarios::excluir),
        );

    let os_routes = Router::new()
        .route("/", post(handlers::os::criar).get(handlers::os::listar))
        .route("/{id}", get(handlers::os::detalhar).put(handlers::os::editar))
        .route("/{id}/info", get(handlers::os::info))
        .route("/{id}/fechar-revisao", post(handlers::os::fechar_revisao))
        .route("/{id}/versoes", get(handlers::os::listar_versoes));

    let despesa_routes = Router::new().route(
        "/",
        get(handlers::os::listar_despesas).post(handlers::os::criar_despesa),
    );

    let producao_routes = Router::new()
        .route(
            "/",
            post(handlers::producao::criar).get(handlers::producao::listar),
        )
        .route(
            "/{id}",
            get(handlers::producao::detalhar)
                .put(handlers::producao::editar)
                .delete(handlers::producao::excluir),
        );

    let manutencao_routes = Router::new()
        .route(
            "/",
            post(handlers::manutencao::criar).get(handlers::manutencao::listar),
        )
        .route(
            "/{id}",
            get(handlers::manutencao::detalhar)
                .put(handlers::manutencao::editar)
                .delete(handlers::manutencao::excluir),
        );

    let produto_routes = Router::new()
        .route(
            "/",
            post(handlers::produtos::criar).get(handlers::produtos::listar),
        )
        .route("/buscar", get(handlers::produtos::buscar))
        .route(
            "/part-number/{part_number}",
            get(handlers::produtos::por_part_number),
        )
        .route(
            "/{id}",
            get(handlers::produtos::detalhar)
                .put(handlers::produtos::editar)
                .delete(handlers::produtos::excluir),
        );

    let compras_routes = Router::new()
        .route(
            "/tipos-fornecedor",
            get(handlers::compras::listar_tipos).post(handlers::compras::criar_tipo),
        )
        .route(
            "/fornecedores",
            get(handlers::compras::listar_fornecedores)
                .post(handlers::compras::criar_fornecedor),
        )
        .route(
            "/fornecedores/{id}",
            get(handlers::compras::detalhar_fornecedor)
                .put(handlers::compras::editar_fornecedor)
                .delete(handlers::compras::excluir_fornecedor),
        )
        .route(
            "/solicitacoes",
            get(handlers::compras::listar_solicitacoes)
                .post(handlers::compras::criar_solicitacao),
        )
        .route(
            "/solicitacoes/{id}",
            get(handlers::compras::detalhar_solicitacao),
        )
        .route(
            "/solicitacoes/{id}/gerar-pedido",
            post(handlers::compras::gerar_pedido),
        )
        .route("/pedidos", get(handlers::compras::listar_pedidos))
        .route("/pedidos/{id}", get(handlers::compras::detalhar_pedido));

    let catalogo_routes = Router::new()
        .route("/maquinas", get(handlers::catalogo::maquinas_por_setor))
        .route(
            "/maquinas/{setor}",
            get(handlers::catalogo::maquinas_do_setor),
        )
        .route(
            "/processos",
            get(handlers::catalogo::processos_por_departamento),
        )
        .route(
            "/processos/{departamento}",
            get(handlers::catalogo::processos_do_departamento),
        );

    let protegidas = Router::new()
        .merge(user_routes)
        .nest("/os", os_routes)
        .nest("/despesas", despesa_routes)
        .nest("/ordens-producao", producao_routes)
        .nest("/manutencao", manutencao_routes)
        .nest("/produtos", produto_routes)
        .nest("/compras", compras_routes)
        .nest("/catalogo", catalogo_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protegidas)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
