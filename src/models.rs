pub mod auth;
pub mod compras;
pub mod manutencao;
pub mod os;
pub mod producao;
pub mod produto;
