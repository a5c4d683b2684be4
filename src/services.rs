pub mod auth;
pub use auth::AuthService;
pub mod os_service;
pub use os_service::OsService;
pub mod producao_service;
pub use producao_service::ProducaoService;
pub mod manutencao_service;
pub use manutencao_service::ManutencaoService;
pub mod compras_service;
pub use compras_service::ComprasService;
pub mod produto_service;
pub use produto_service::ProdutoService;
