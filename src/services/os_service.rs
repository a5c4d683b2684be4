// src/services/os_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, policy},
    db::OsRepository,
    models::{
        auth::{Papel, User},
        os::{
            Carregamento, CustoDetalhe, Despesa, DespesaPayload, Os, OsDetalhe, OsFiltro,
            OsPayload, OsVersao, SnapshotCabecalho, SnapshotCarregamento, SnapshotCusto,
            SnapshotDados, SnapshotEnderecos, TipoDespesa,
        },
    },
};

const MOTIVO_PADRAO: &str = "Alterações gerais";

/// Aplica o formulário sobre a OS carregada respeitando o papel do usuário.
///
/// Sem `pode_editar_geral`, apenas status, observacoes e obs2 são aplicados;
/// o restante do formulário é descartado em silêncio, sem erro. Esse é o
/// comportamento histórico do sistema e as telas dependem dele.
pub fn aplicar_edicao(os: &mut Os, payload: &OsPayload, pode_editar_geral: bool) {
    os.status = payload.status;
    os.observacoes = payload.observacoes.clone();
    os.obs2 = payload.obs2.clone();

    if !pode_editar_geral {
        return;
    }

    os.numero = payload.numero.clone();
    os.cliente = payload.cliente.clone();
    os.fase = payload.fase;
    os.empresa = payload.empresa.clone();

    os.data_emissao = payload.data_emissao;
    os.data_inicio = payload.data_inicio;
    os.data_termino = payload.data_termino;
    os.data_entrega = payload.data_entrega;
    os.data_conclusao = payload.data_conclusao;

    os.tipo_contrato = payload.tipo_contrato.clone();
    os.valor = payload.valor;

    os.tipo_loc = payload.tipo_loc.clone();
    os.tipo_os = payload.tipo_os.clone();
    os.modelo = payload.modelo.clone();
    os.qtde = payload.qtde;
    os.largura = payload.largura;
    os.comprim = payload.comprim;
    os.pe_direito = payload.pe_direito;
    os.piso = payload.piso.clone();
    os.acessorios = payload.acessorios.clone();

    os.razao = payload.razao.clone();
    os.cnpj = payload.cnpj.clone();
    os.insc = payload.insc.clone();
    os.email = payload.email.clone();
    os.telefone = payload.telefone.clone();

    os.segtrab = payload.segtrab.clone();
    os.integracao = payload.integracao.clone();
    os.vendedor = payload.vendedor.clone();

    os.endereco = payload.endereco.clone();
    os.bairro = payload.bairro.clone();
    os.cidade = payload.cidade.clone();
    os.uf = payload.uf.clone();
    os.cep = payload.cep.clone();

    os.fat_endereco = payload.fat_endereco.clone();
    os.fat_bairro = payload.fat_bairro.clone();
    os.fat_cidade = payload.fat_cidade.clone();
    os.fat_uf = payload.fat_uf.clone();
    os.fat_cep = payload.fat_cep.clone();
    os.fat_emails = payload.fat_emails.clone();

    os.mont_endereco = payload.mont_endereco.clone();
    os.mont_bairro = payload.mont_bairro.clone();
    os.mont_cidade = payload.mont_cidade.clone();
    os.mont_uf = payload.mont_uf.clone();
    os.mont_cep = payload.mont_cep.clone();
}

/// Congela o estado atual da OS em um payload serializável. Os opcionais
/// viram defaults tipados aqui, de uma vez, para que o snapshot não dependa
/// de como o leitor trata nulos.
pub fn montar_snapshot(
    os: &Os,
    custos_operacionais: &[CustoDetalhe],
    custos_visitas: &[CustoDetalhe],
    carregamentos: &[Carregamento],
) -> SnapshotDados {
    let cabecalho = SnapshotCabecalho {
        numero: os.numero.clone(),
        cliente: os.cliente.clone(),
        fase: os.fase,
        empresa: os.empresa.clone().unwrap_or_default(),
        status: os.status,
        valor_total: os.valor,
        data_emissao: os.data_emissao,
        data_entrega: os.data_entrega,
        data_conclusao: os.data_conclusao,
        tipo_contrato: os.tipo_contrato.clone().unwrap_or_default(),
        tipo_os: os.tipo_os.clone().unwrap_or_default(),
        observacoes: os.observacoes.clone(),
        obs2: os.obs2.clone().unwrap_or_default(),
        enderecos: SnapshotEnderecos {
            fat_endereco: os.fat_endereco.clone().unwrap_or_default(),
            fat_cidade: os.fat_cidade.clone().unwrap_or_default(),
            mont_endereco: os.mont_endereco.clone().unwrap_or_default(),
            mont_cidade: os.mont_cidade.clone().unwrap_or_default(),
        },
    };

    let congela_custo = |tipo: TipoDespesa, c: &CustoDetalhe| SnapshotCusto {
        tipo,
        despesa: c.despesa_descricao.clone(),
        valor_previsto: c.valor,
        valor_realizado: c.valor_realizado,
        data: c.data,
        responsavel: c.responsavel.clone(),
        obs: c.observacao.clone(),
    };

    let custos = custos_operacionais
        .iter()
        .map(|c| congela_custo(TipoDespesa::Operacional, c))
        .chain(
            custos_visitas
                .iter()
                .map(|c| congela_custo(TipoDespesa::Visita, c)),
        )
        .collect();

    let carregamentos = carregamentos
        .iter()
        .map(|c| SnapshotCarregamento {
            data: c.data,
            placa: c.placa_caminhao.clone(),
            doc: c.documento_referencia.clone(),
            obs: c.observacao.clone(),
        })
        .collect();

    SnapshotDados {
        cabecalho,
        custos,
        carregamentos,
    }
}

#[derive(Clone)]
pub struct OsService {
    os_repo: OsRepository,
    pool: PgPool,
}

impl OsService {
    pub fn new(os_repo: OsRepository, pool: PgPool) -> Self {
        Self { os_repo, pool }
    }

    pub async fn criar_os(&self, payload: &OsPayload, papel: Papel) -> Result<Os, AppError> {
        if !policy::pode_editar_geral(papel) {
            return Err(AppError::AccessDenied(
                "Você não tem permissão para criar uma OS.",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let os = self.os_repo.insert_os(&mut *tx, payload).await?;

        for custo in &payload.custos_operacionais {
            self.os_repo
                .insert_custo(&mut *tx, os.id, TipoDespesa::Operacional, custo)
                .await?;
        }
        for custo in &payload.custos_visitas {
            self.os_repo
                .insert_custo(&mut *tx, os.id, TipoDespesa::Visita, custo)
                .await?;
        }
        for carga in &payload.carregamentos {
            self.os_repo
                .insert_carregamento(&mut *tx, os.id, carga)
                .await?;
        }

        tx.commit().await?;
        Ok(os)
    }

    pub async fn listar(&self, filtro: &OsFiltro) -> Result<Vec<Os>, AppError> {
        self.os_repo.get_all(filtro).await
    }

    pub async fn detalhar(&self, id: Uuid) -> Result<OsDetalhe, AppError> {
        let os = self
            .os_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("OS não encontrada."))?;

        let custos_operacionais = self
            .os_repo
            .get_custos(&self.pool, id, TipoDespesa::Operacional)
            .await?;
        let custos_visitas = self
            .os_repo
            .get_custos(&self.pool, id, TipoDespesa::Visita)
            .await?;
        let carregamentos = self.os_repo.get_carregamentos(&self.pool, id).await?;
        let versoes = self.os_repo.get_versoes(id).await?;

        Ok(OsDetalhe {
            os,
            custos_operacionais,
            custos_visitas,
            carregamentos,
            versoes,
        })
    }

    /// Edição completa do formulário em uma transação: cabeçalho conforme a
    /// política, custos sempre substituídos, carregamentos só com edição geral.
    pub async fn editar_os(
        &self,
        id: Uuid,
        payload: &OsPayload,
        papel: Papel,
    ) -> Result<Os, AppError> {
        let pode_geral = policy::pode_editar_geral(papel);

        let mut tx = self.pool.begin().await?;

        let mut os = self
            .os_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("OS não encontrada."))?;

        aplicar_edicao(&mut os, payload, pode_geral);
        let os = self.os_repo.update_os(&mut *tx, &os).await?;

        self.os_repo
            .delete_custos(&mut *tx, id, TipoDespesa::Operacional)
            .await?;
        for custo in &payload.custos_operacionais {
            self.os_repo
                .insert_custo(&mut *tx, id, TipoDespesa::Operacional, custo)
                .await?;
        }
        self.os_repo
            .delete_custos(&mut *tx, id, TipoDespesa::Visita)
            .await?;
        for custo in &payload.custos_visitas {
            self.os_repo
                .insert_custo(&mut *tx, id, TipoDespesa::Visita, custo)
                .await?;
        }

        if pode_geral {
            self.os_repo.delete_carregamentos(&mut *tx, id).await?;
            for carga in &payload.carregamentos {
                self.os_repo.insert_carregamento(&mut *tx, id, carga).await?;
            }
        }

        tx.commit().await?;
        Ok(os)
    }

    /// Arquiva o estado atual como `os_versao` com o número de revisão
    /// vigente e só então incrementa `os.revisao`, tudo em uma transação.
    pub async fn fechar_revisao(
        &self,
        id: Uuid,
        user: &User,
        motivo: Option<&str>,
    ) -> Result<OsVersao, AppError> {
        if !policy::pode_editar_geral(user.papel) {
            return Err(AppError::AccessDenied(
                "Você não tem permissão para fechar uma revisão.",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let os = self
            .os_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("OS não encontrada."))?;

        let custos_operacionais = self
            .os_repo
            .get_custos(&mut *tx, id, TipoDespesa::Operacional)
            .await?;
        let custos_visitas = self
            .os_repo
            .get_custos(&mut *tx, id, TipoDespesa::Visita)
            .await?;
        let carregamentos = self.os_repo.get_carregamentos(&mut *tx, id).await?;

        let snapshot = montar_snapshot(&os, &custos_operacionais, &custos_visitas, &carregamentos);
        let dados = serde_json::to_string(&snapshot).map_err(anyhow::Error::from)?;

        let motivo = match motivo {
            Some(m) if !m.trim().is_empty() => m.trim(),
            _ => MOTIVO_PADRAO,
        };

        let versao = self
            .os_repo
            .insert_versao(&mut *tx, id, os.revisao, &user.username, motivo, &dados)
            .await?;

        let nova_revisao = self.os_repo.increment_revisao(&mut *tx, id).await?;
        tracing::info!(os = %os.numero, revisao = nova_revisao, "revisão fechada");

        tx.commit().await?;
        Ok(versao)
    }

    /// Consulta enxuta usada pelo formulário de OP para preencher o cliente.
    pub async fn cliente_da_os(&self, id: Uuid) -> Result<String, AppError> {
        let os = self
            .os_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("OS não encontrada."))?;

        Ok(os.cliente)
    }

    pub async fn listar_versoes(&self, os_id: Uuid) -> Result<Vec<OsVersao>, AppError> {
        // Garante 404 para OS inexistente em vez de lista vazia.
        self.os_repo
            .find_by_id(&self.pool, os_id)
            .await?
            .ok_or(AppError::NotFound("OS não encontrada."))?;

        self.os_repo.get_versoes(os_id).await
    }

    // --- Despesas (tabela de consulta) ---

    pub async fn criar_despesa(&self, payload: &DespesaPayload) -> Result<Despesa, AppError> {
        if self
            .os_repo
            .find_despesa_por_descricao(&payload.descricao)
            .await?
            .is_some()
        {
            return Err(AppError::BusinessRule(format!(
                "A despesa '{}' já está cadastrada.",
                payload.descricao
            )));
        }

        self.os_repo
            .insert_despesa(&payload.descricao, payload.tipo)
            .await
    }

    pub async fn listar_despesas(&self) -> Result<Vec<Despesa>, AppError> {
        self.os_repo.get_all_despesas().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::models::os::{OsFase, OsStatus};

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn os_exemplo() -> Os {
        Os {
            id: Uuid::new_v4(),
            numero: "OS-100".into(),
            cliente: "Construtora Alfa".into(),
            fase: OsFase::Os,
            status: OsStatus::Aberta,
            data_criacao: chrono::Utc::now(),
            empresa: Some("Reconlog".into()),
            data_emissao: data(2025, 3, 10),
            data_inicio: None,
            data_termino: None,
            data_entrega: Some(data(2025, 4, 1)),
            data_conclusao: None,
            tipo_contrato: Some("Locação".into()),
            valor: dec!(15000.00),
            tipo_loc: None,
            tipo_os: Some("Locação".into()),
            modelo: None,
            qtde: None,
            largura: None,
            comprim: None,
            pe_direito: None,
            piso: None,
            acessorios: None,
            observacoes: Some("obra em fase inicial".into()),
            obs2: None,
            razao: None,
            cnpj: None,
            insc: None,
            email: None,
            telefone: None,
            segtrab: None,
            integracao: None,
            vendedor: None,
            endereco: None,
            bairro: None,
            cidade: None,
            uf: None,
            cep: None,
            fat_endereco: Some("Rua das Palmeiras, 100".into()),
            fat_bairro: None,
            fat_cidade: Some("Campinas".into()),
            fat_uf: None,
            fat_cep: None,
            fat_emails: None,
            mont_endereco: None,
            mont_bairro: None,
            mont_cidade: None,
            mont_uf: None,
            mont_cep: None,
            revisao: 2,
        }
    }

    fn payload_exemplo() -> OsPayload {
        OsPayload {
            numero: "OS-100".into(),
            cliente: "Construtora Beta".into(),
            fase: OsFase::Os,
            status: OsStatus::EmAndamento,
            empresa: Some("Reconlog".into()),
            data_emissao: data(2025, 3, 10),
            data_inicio: None,
            data_termino: None,
            data_entrega: Some(data(2025, 4, 15)),
            data_conclusao: None,
            tipo_contrato: Some("Locação".into()),
            valor: dec!(22000.00),
            tipo_loc: None,
            tipo_os: Some("Locação".into()),
            modelo: None,
            qtde: None,
            largura: None,
            comprim: None,
            pe_direito: None,
            piso: None,
            acessorios: None,
            observacoes: Some("cronograma revisado".into()),
            obs2: Some("aguardando ART".into()),
            razao: None,
            cnpj: None,
            insc: None,
            email: None,
            telefone: None,
            segtrab: None,
            integracao: None,
            vendedor: None,
            endereco: None,
            bairro: None,
            cidade: None,
            uf: None,
            cep: None,
            fat_endereco: None,
            fat_bairro: None,
            fat_cidade: None,
            fat_uf: None,
            fat_cep: None,
            fat_emails: None,
            mont_endereco: None,
            mont_bairro: None,
            mont_cidade: None,
            mont_uf: None,
            mont_cep: None,
            custos_operacionais: vec![],
            custos_visitas: vec![],
            carregamentos: vec![],
        }
    }

    fn custo_exemplo(descricao: &str, valor: Decimal) -> CustoDetalhe {
        CustoDetalhe {
            id: Uuid::new_v4(),
            os_id: Uuid::new_v4(),
            despesa_id: Uuid::new_v4(),
            despesa_descricao: descricao.into(),
            valor,
            valor_realizado: None,
            data: data(2025, 3, 12),
            observacao: None,
            responsavel: "Reconlog".into(),
        }
    }

    #[test]
    fn edicao_sem_permissao_geral_aplica_somente_campos_liberados() {
        let mut os = os_exemplo();
        let payload = payload_exemplo();

        aplicar_edicao(&mut os, &payload, false);

        // Campos liberados para qualquer papel
        assert_eq!(os.status, OsStatus::EmAndamento);
        assert_eq!(os.observacoes.as_deref(), Some("cronograma revisado"));
        assert_eq!(os.obs2.as_deref(), Some("aguardando ART"));

        // Campos de cadastro ignorados em silêncio
        assert_eq!(os.cliente, "Construtora Alfa");
        assert_eq!(os.valor, dec!(15000.00));
        assert_eq!(os.data_entrega, Some(data(2025, 4, 1)));
    }

    #[test]
    fn edicao_com_permissao_geral_aplica_tudo() {
        let mut os = os_exemplo();
        let payload = payload_exemplo();

        aplicar_edicao(&mut os, &payload, true);

        assert_eq!(os.cliente, "Construtora Beta");
        assert_eq!(os.valor, dec!(22000.00));
        assert_eq!(os.data_entrega, Some(data(2025, 4, 15)));
        assert_eq!(os.status, OsStatus::EmAndamento);
    }

    #[test]
    fn edicao_nunca_altera_revisao() {
        let mut os = os_exemplo();
        aplicar_edicao(&mut os, &payload_exemplo(), true);
        assert_eq!(os.revisao, 2);
    }

    #[test]
    fn snapshot_resolve_opcionais_com_default_tipado() {
        let mut os = os_exemplo();
        os.empresa = None;
        os.obs2 = None;
        os.mont_endereco = None;

        let snapshot = montar_snapshot(&os, &[], &[], &[]);

        assert_eq!(snapshot.cabecalho.empresa, "");
        assert_eq!(snapshot.cabecalho.obs2, "");
        assert_eq!(snapshot.cabecalho.enderecos.mont_endereco, "");
        assert_eq!(snapshot.cabecalho.enderecos.fat_cidade, "Campinas");
    }

    #[test]
    fn snapshot_concatena_custos_na_ordem_operacional_depois_visita() {
        let os = os_exemplo();
        let operacionais = vec![custo_exemplo("Frete", dec!(800.00))];
        let visitas = vec![custo_exemplo("Pedágio", dec!(45.50))];

        let snapshot = montar_snapshot(&os, &operacionais, &visitas, &[]);

        assert_eq!(snapshot.custos.len(), 2);
        assert_eq!(snapshot.custos[0].tipo, TipoDespesa::Operacional);
        assert_eq!(snapshot.custos[0].despesa, "Frete");
        assert_eq!(snapshot.custos[1].tipo, TipoDespesa::Visita);
        assert_eq!(snapshot.custos[1].valor_previsto, dec!(45.50));
    }

    #[test]
    fn snapshot_serializado_sobrevive_a_mutacao_posterior_da_os() {
        let mut os = os_exemplo();
        let custos = vec![custo_exemplo("Guindaste", dec!(1200.00))];

        let snapshot = montar_snapshot(&os, &custos, &[], &[]);
        let dados = serde_json::to_string(&snapshot).unwrap();

        // A OS viva muda depois do arquivamento
        os.cliente = "Outro Cliente".into();
        os.valor = dec!(99999.00);

        let relido: SnapshotDados = serde_json::from_str(&dados).unwrap();
        assert_eq!(relido, snapshot);
        assert_eq!(relido.cabecalho.cliente, "Construtora Alfa");
        assert_eq!(relido.cabecalho.valor_total, dec!(15000.00));
    }

    #[test]
    fn snapshot_serializa_datas_como_iso_e_valores_como_numero() {
        let os = os_exemplo();
        let snapshot = montar_snapshot(&os, &[], &[], &[]);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();

        assert_eq!(json["cabecalho"]["data_emissao"], "2025-03-10");
        assert!(json["cabecalho"]["valor_total"].is_number());
    }
}
