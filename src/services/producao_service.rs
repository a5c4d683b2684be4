// src/services/producao_service.rs

use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{catalogo, error::AppError, policy},
    db::ProducaoRepository,
    models::{
        auth::Papel,
        producao::{ControleProducao, OpDetalhe, OrdemProducao, OrdemProducaoPayload},
    },
};

/// Soma das durações dos apontamentos, no formato HH:MM. Horas acumulam
/// além de 24 (ex.: "30:15"). Linhas sem início ou término completos não
/// contam; intervalos invertidos também não.
pub fn duracao_total(controles: &[ControleProducao]) -> String {
    let mut minutos_totais: i64 = 0;

    for c in controles {
        let inicio = match (c.data_inicio, c.hora_inicio) {
            (Some(d), Some(h)) => NaiveDateTime::new(d, h),
            _ => continue,
        };
        let termino = match (c.data_termino, c.hora_termino) {
            (Some(d), Some(h)) => NaiveDateTime::new(d, h),
            _ => continue,
        };

        let minutos = (termino - inicio).num_minutes();
        if minutos > 0 {
            minutos_totais += minutos;
        }
    }

    format!("{:02}:{:02}", minutos_totais / 60, minutos_totais % 60)
}

fn validar_processos(payload: &OrdemProducaoPayload) -> Result<(), AppError> {
    for controle in &payload.controles_producao {
        let departamento = controle
            .departamento
            .as_deref()
            .unwrap_or(&payload.departamento);

        if let Some(processo) = controle.processo.as_deref()
            && !catalogo::processo_valido_para_departamento(departamento, processo)
        {
            return Err(AppError::BusinessRule(format!(
                "O processo '{}' não pertence ao departamento '{}'.",
                processo, departamento
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProducaoService {
    producao_repo: ProducaoRepository,
    pool: PgPool,
}

impl ProducaoService {
    pub fn new(producao_repo: ProducaoRepository, pool: PgPool) -> Self {
        Self {
            producao_repo,
            pool,
        }
    }

    /// Cria a OP com o próximo número da sequência. Sem trava: se duas
    /// criações colidirem, a UNIQUE de `numero_sequencial` devolve 409 e o
    /// cliente reenvia.
    pub async fn criar_op(&self, payload: &OrdemProducaoPayload) -> Result<OrdemProducao, AppError> {
        validar_processos(payload)?;

        let mut tx = self.pool.begin().await?;

        let numero = self.producao_repo.next_numero_sequencial(&mut *tx).await?;
        let op = self.producao_repo.insert_op(&mut *tx, numero, payload).await?;

        for controle in &payload.controles_producao {
            self.producao_repo
                .insert_controle(&mut *tx, op.id, controle)
                .await?;
        }
        for romaneio in &payload.romaneios {
            self.producao_repo
                .insert_romaneio(&mut *tx, op.id, romaneio)
                .await?;
        }

        tx.commit().await?;
        Ok(op)
    }

    pub async fn editar_op(
        &self,
        id: Uuid,
        payload: &OrdemProducaoPayload,
    ) -> Result<OrdemProducao, AppError> {
        validar_processos(payload)?;

        let mut tx = self.pool.begin().await?;

        let op = self.producao_repo.update_op(&mut *tx, id, payload).await?;

        self.producao_repo.delete_controles(&mut *tx, id).await?;
        for controle in &payload.controles_producao {
            self.producao_repo
                .insert_controle(&mut *tx, id, controle)
                .await?;
        }

        self.producao_repo.delete_romaneios(&mut *tx, id).await?;
        for romaneio in &payload.romaneios {
            self.producao_repo
                .insert_romaneio(&mut *tx, id, romaneio)
                .await?;
        }

        tx.commit().await?;
        Ok(op)
    }

    pub async fn listar(&self, cliente: Option<&str>) -> Result<Vec<OrdemProducao>, AppError> {
        self.producao_repo.get_all(cliente).await
    }

    pub async fn detalhar(&self, id: Uuid) -> Result<OpDetalhe, AppError> {
        let op = self
            .producao_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Ordem de Produção não encontrada."))?;

        let controles = self.producao_repo.get_controles(id).await?;
        let romaneios = self.producao_repo.get_romaneios(id).await?;
        let duracao = duracao_total(&controles);

        Ok(OpDetalhe {
            op,
            controles_producao: controles,
            romaneios,
            duracao_total: duracao,
        })
    }

    pub async fn excluir_op(&self, id: Uuid, papel: Papel) -> Result<(), AppError> {
        if !policy::eh_admin(papel) {
            return Err(AppError::AccessDenied(
                "Apenas o administrador pode excluir uma OP.",
            ));
        }
        self.producao_repo.delete_op(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn controle(
        inicio: Option<(&str, &str)>,
        termino: Option<(&str, &str)>,
    ) -> ControleProducao {
        let parse_data = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let parse_hora = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").unwrap();

        ControleProducao {
            id: Uuid::new_v4(),
            ordem_producao_id: Uuid::new_v4(),
            turno: None,
            departamento: None,
            obs_prod: None,
            processo: None,
            maquina: None,
            operador: None,
            data_inicio: inicio.map(|(d, _)| parse_data(d)),
            hora_inicio: inicio.map(|(_, h)| parse_hora(h)),
            data_pausa: None,
            motivo_pausa: None,
            data_termino: termino.map(|(d, _)| parse_data(d)),
            hora_termino: termino.map(|(_, h)| parse_hora(h)),
            qualidade: None,
        }
    }

    #[test]
    fn duracao_total_soma_varias_linhas() {
        let controles = vec![
            controle(Some(("2025-05-05", "08:00")), Some(("2025-05-05", "12:30"))),
            controle(Some(("2025-05-06", "13:00")), Some(("2025-05-06", "17:00"))),
        ];
        // 4h30 + 4h00
        assert_eq!(duracao_total(&controles), "08:30");
    }

    #[test]
    fn duracao_total_atravessa_dias_sem_saturar_em_24h() {
        let controles = vec![controle(
            Some(("2025-05-05", "22:00")),
            Some(("2025-05-07", "04:15")),
        )];
        assert_eq!(duracao_total(&controles), "30:15");
    }

    #[test]
    fn duracao_total_ignora_linhas_incompletas_ou_invertidas() {
        let controles = vec![
            controle(Some(("2025-05-05", "08:00")), None),
            controle(None, Some(("2025-05-05", "12:00"))),
            // término antes do início
            controle(Some(("2025-05-05", "15:00")), Some(("2025-05-05", "14:00"))),
            controle(Some(("2025-05-05", "09:00")), Some(("2025-05-05", "10:00"))),
        ];
        assert_eq!(duracao_total(&controles), "01:00");
    }

    #[test]
    fn duracao_total_vazia_e_zero() {
        assert_eq!(duracao_total(&[]), "00:00");
    }
}
