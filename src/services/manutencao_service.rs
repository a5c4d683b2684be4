// src/services/manutencao_service.rs

use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{catalogo, error::AppError, policy},
    db::ManutencaoRepository,
    models::{
        auth::Papel,
        manutencao::{ManutApont, ManutDetalhe, OsManutencao, OsManutencaoPayload},
    },
};

/// Próximo número da OS de manutenção a partir do maior já emitido.
/// Números são strings puramente numéricas; o primeiro é "1".
pub fn proximo_numero(max_atual: Option<i64>) -> String {
    (max_atual.unwrap_or(0) + 1).to_string()
}

/// Mesma soma HH:MM das OPs, sobre os apontamentos dos manutentores.
pub fn duracao_total(apontamentos: &[ManutApont]) -> String {
    let mut minutos_totais: i64 = 0;

    for a in apontamentos {
        let inicio = match (a.data_inicio, a.hora_inicio) {
            (Some(d), Some(h)) => NaiveDateTime::new(d, h),
            _ => continue,
        };
        let termino = match (a.data_termino, a.hora_termino) {
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

fn validar_maquina(payload: &OsManutencaoPayload) -> Result<(), AppError> {
    if let Some(setor) = payload.area_setor.as_deref()
        && !catalogo::maquina_valida_para_setor(setor, &payload.maq_equip)
    {
        return Err(AppError::BusinessRule(format!(
            "A máquina '{}' não pertence ao setor '{}'.",
            payload.maq_equip, setor
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ManutencaoService {
    manutencao_repo: ManutencaoRepository,
    pool: PgPool,
}

impl ManutencaoService {
    pub fn new(manutencao_repo: ManutencaoRepository, pool: PgPool) -> Self {
        Self {
            manutencao_repo,
            pool,
        }
    }

    pub async fn criar_os(&self, payload: &OsManutencaoPayload) -> Result<OsManutencao, AppError> {
        validar_maquina(payload)?;

        let mut tx = self.pool.begin().await?;

        let max = self.manutencao_repo.max_numero(&mut *tx).await?;
        let numero = proximo_numero(max);

        let os = self
            .manutencao_repo
            .insert_os(&mut *tx, &numero, payload)
            .await?;

        for apont in &payload.apontamentos {
            self.manutencao_repo
                .insert_apontamento(&mut *tx, os.id, apont)
                .await?;
        }

        tx.commit().await?;
        Ok(os)
    }

    pub async fn editar_os(
        &self,
        id: Uuid,
        payload: &OsManutencaoPayload,
    ) -> Result<OsManutencao, AppError> {
        validar_maquina(payload)?;

        let mut tx = self.pool.begin().await?;

        let os = self.manutencao_repo.update_os(&mut *tx, id, payload).await?;

        self.manutencao_repo.delete_apontamentos(&mut *tx, id).await?;
        for apont in &payload.apontamentos {
            self.manutencao_repo
                .insert_apontamento(&mut *tx, id, apont)
                .await?;
        }

        tx.commit().await?;
        Ok(os)
    }

    pub async fn listar(&self) -> Result<Vec<OsManutencao>, AppError> {
        self.manutencao_repo.get_all().await
    }

    pub async fn detalhar(&self, id: Uuid) -> Result<ManutDetalhe, AppError> {
        let os = self
            .manutencao_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("OS de Manutenção não encontrada."))?;

        let apontamentos = self.manutencao_repo.get_apontamentos(id).await?;
        let duracao = duracao_total(&apontamentos);

        Ok(ManutDetalhe {
            os,
            apontamentos,
            duracao_total: duracao,
        })
    }

    pub async fn excluir_os(&self, id: Uuid, papel: Papel) -> Result<(), AppError> {
        if !policy::eh_admin(papel) {
            return Err(AppError::AccessDenied(
                "Apenas o administrador pode excluir uma OS de manutenção.",
            ));
        }
        self.manutencao_repo.delete_os(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn primeiro_numero_e_um() {
        assert_eq!(proximo_numero(None), "1");
    }

    #[test]
    fn numero_segue_o_maior_emitido() {
        assert_eq!(proximo_numero(Some(41)), "42");
    }

    #[test]
    fn duracao_soma_apontamentos_completos() {
        let apont = |di: &str, hi: &str, dt: &str, ht: &str| ManutApont {
            id: Uuid::new_v4(),
            os_manutencao_id: Uuid::new_v4(),
            manutentor: "José".into(),
            data_inicio: Some(NaiveDate::parse_from_str(di, "%Y-%m-%d").unwrap()),
            hora_inicio: Some(NaiveTime::parse_from_str(hi, "%H:%M").unwrap()),
            data_termino: Some(NaiveDate::parse_from_str(dt, "%Y-%m-%d").unwrap()),
            hora_termino: Some(NaiveTime::parse_from_str(ht, "%H:%M").unwrap()),
        };

        let apontamentos = vec![
            apont("2025-06-02", "07:30", "2025-06-02", "11:45"),
            apont("2025-06-02", "13:00", "2025-06-02", "15:00"),
        ];
        assert_eq!(duracao_total(&apontamentos), "06:15");
    }
}
