pub mod auth;
pub mod catalogo;
pub mod compras;
pub mod manutencao;
pub mod os;
pub mod producao;
pub mod produtos;
pub mod usuarios;
