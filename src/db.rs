pub mod user_repo;
pub use user_repo::UserRepository;
pub mod os_repo;
pub use os_repo::OsRepository;
pub mod producao_repo;
pub use producao_repo::ProducaoRepository;
pub mod manutencao_repo;
pub use manutencao_repo::ManutencaoRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod compras_repo;
pub use compras_repo::ComprasRepository;
