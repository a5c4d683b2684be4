pub mod catalogo;
pub mod error;
pub mod policy;
