// src/services/produto_service.rs

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProdutoRepository,
    models::produto::{Produto, ProdutoPayload, ResumoImportacao},
};

/// Linha crua do CSV de produtos (separador ';', decimal com vírgula).
#[derive(Debug, Deserialize)]
pub struct LinhaCsv {
    pub part_number: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub tipo_de_material: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub custo: String,
}

fn opcional(valor: &str) -> Option<String> {
    let limpo = valor.trim();
    if limpo.is_empty() {
        None
    } else {
        Some(limpo.to_string())
    }
}

/// Converte uma linha do CSV em payload de produto. Devolve o motivo do
/// descarte quando a linha não serve.
pub fn converter_linha(linha: &LinhaCsv) -> Result<ProdutoPayload, String> {
    let part_number = linha.part_number.trim();
    if part_number.is_empty() {
        return Err("part_number vazio".to_string());
    }

    let custo_texto = linha.custo.trim().replace(',', ".");
    let custo = Decimal::from_str(&custo_texto)
        .map_err(|_| format!("custo inválido: '{}'", linha.custo.trim()))?;

    Ok(ProdutoPayload {
        part_number: part_number.to_string(),
        sku: opcional(&linha.sku),
        descricao: linha.descricao.trim().to_string(),
        tipo_de_material: opcional(&linha.tipo_de_material),
        custo,
    })
}

#[derive(Clone)]
pub struct ProdutoService {
    produto_repo: ProdutoRepository,
    pool: PgPool,
}

impl ProdutoService {
    pub fn new(produto_repo: ProdutoRepository, pool: PgPool) -> Self {
        Self { produto_repo, pool }
    }

    pub async fn criar(&self, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        self.produto_repo.insert(&self.pool, payload).await
    }

    pub async fn editar(&self, id: Uuid, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        self.produto_repo.update(id, payload).await
    }

    pub async fn detalhar(&self, id: Uuid) -> Result<Produto, AppError> {
        self.produto_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Produto não encontrado."))
    }

    pub async fn por_part_number(&self, part_number: &str) -> Result<Produto, AppError> {
        self.produto_repo
            .find_by_part_number(part_number)
            .await?
            .ok_or(AppError::NotFound("Produto não encontrado."))
    }

    pub async fn listar(&self) -> Result<Vec<Produto>, AppError> {
        self.produto_repo.get_all().await
    }

    pub async fn buscar(&self, termo: &str) -> Result<Vec<Produto>, AppError> {
        self.produto_repo.search(termo).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.produto_repo.delete(id).await
    }

    /// Importação em bloco: o catálogo atual é apagado e o arquivo passa a
    /// ser a verdade. Linhas ruins são puladas com aviso no log; arquivo
    /// ilegível aborta antes de tocar no banco.
    pub async fn importar_csv(&self, caminho: &Path) -> Result<ResumoImportacao, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_path(caminho)
            .map_err(|e| {
                anyhow::anyhow!("não foi possível ler '{}': {}", caminho.display(), e)
            })?;

        let mut payloads = Vec::new();
        let mut ignorados = 0usize;

        for (indice, resultado) in reader.deserialize::<LinhaCsv>().enumerate() {
            // +2: uma pelo cabeçalho, outra pelo índice começar em zero
            let numero_linha = indice + 2;
            let linha = match resultado {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(linha = numero_linha, "linha malformada ignorada: {}", e);
                    ignorados += 1;
                    continue;
                }
            };

            match converter_linha(&linha) {
                Ok(payload) => payloads.push(payload),
                Err(motivo) => {
                    tracing::warn!(linha = numero_linha, "linha ignorada: {}", motivo);
                    ignorados += 1;
                }
            }
        }

        let mut tx = self.pool.begin().await?;

        let removidos = self.produto_repo.delete_all(&mut *tx).await?;
        for payload in &payloads {
            self.produto_repo.insert(&mut *tx, payload).await?;
        }

        tx.commit().await?;

        let resumo = ResumoImportacao {
            importados: payloads.len(),
            ignorados,
            removidos: removidos as usize,
        };
        tracing::info!(
            importados = resumo.importados,
            ignorados = resumo.ignorados,
            removidos = resumo.removidos,
            "importação de produtos concluída"
        );
        Ok(resumo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn linha(part_number: &str, sku: &str, tipo: &str, descricao: &str, custo: &str) -> LinhaCsv {
        LinhaCsv {
            part_number: part_number.into(),
            sku: sku.into(),
            tipo_de_material: tipo.into(),
            descricao: descricao.into(),
            custo: custo.into(),
        }
    }

    #[test]
    fn converte_decimal_com_virgula() {
        let payload =
            converter_linha(&linha("PN-001", "SKU-9", "Aço", "Chapa galvanizada", "1234,56"))
                .unwrap();
        assert_eq!(payload.custo, dec!(1234.56));
        assert_eq!(payload.part_number, "PN-001");
        assert_eq!(payload.sku.as_deref(), Some("SKU-9"));
    }

    #[test]
    fn descarta_linha_sem_part_number() {
        let erro = converter_linha(&linha("   ", "SKU-9", "", "Chapa", "10,00")).unwrap_err();
        assert!(erro.contains("part_number"));
    }

    #[test]
    fn descarta_custo_ilegivel() {
        let erro = converter_linha(&linha("PN-002", "", "", "Perfil U", "dez reais")).unwrap_err();
        assert!(erro.contains("custo"));
    }

    #[test]
    fn campos_vazios_viram_none() {
        let payload = converter_linha(&linha("PN-003", "", "  ", "Telha", "0,00")).unwrap();
        assert!(payload.sku.is_none());
        assert!(payload.tipo_de_material.is_none());
        assert_eq!(payload.custo, dec!(0.00));
    }
}
