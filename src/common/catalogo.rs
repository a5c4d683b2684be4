// src/common/catalogo.rs
//
// Catálogos fixos da fábrica, carregados uma única vez no início do
// processo. São dados de configuração imutáveis: nenhuma rota escreve aqui.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Máquinas disponíveis por setor (usado na OS de Manutenção).
pub static MAQUINAS_POR_SETOR: LazyLock<BTreeMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        BTreeMap::from([
            ("ADM", vec!["ESCRITORIO"]),
            ("FACILITIES", vec!["PREDIAL"]),
            (
                "FABRICA DE LONAS",
                vec![
                    "MÁQUINA DE AR QUENTE - S/ID (ID: 13)",
                    "MÁQUINA DE COSTURA - S/ID (ID: 12)",
                    "MÁQUINA DE ILHOS - S/ID (ID: 14)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 17K (ID: 1)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 2)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 3)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 4)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 5)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 6)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 7)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 8)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 9)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 10)",
                    "MÁQUINA DE SOLDA DE ALTA FREQUÊNCIA - 7G (ID: 11)",
                ],
            ),
            (
                "LAVAGEM DE LONAS",
                vec!["MAKITA - DXT (ID: 26)", "SERRA - S/ID (ID: 27)"],
            ),
            (
                "METALURGICA",
                vec![
                    "FURADEIRA DE BANCADA KONE - KM30MF (ID: 21)",
                    "PLASMA CNC METALIQUE - MT01 (ID: 25)",
                    "PLASMA CNC METALIQUE - MT10 (ID: 24)",
                    "PRENSA MAQ DRAW - S/ID (ID: 22)",
                    "SERRA DE FITA FRANHO - FMG500HM (ID: 15)",
                    "SERRA DE FITA FRANHO - FMG500HM (ID: 16)",
                    "SERRA DE FITA FRANHO - FMG500HM (ID: 17)",
                    "SERRA DE FITA FRANHO - FMG500HM (ID: 18)",
                    "SERRA DE FITA FRANHO - FMG500HM (ID: 19)",
                    "SERRA DE FITA KONE - KM30MF (ID: 20)",
                    "SERRA POLICORTE - S/ID (ID: 23)",
                ],
            ),
        ])
    });

/// Processos válidos por departamento (usado no Controle de Produção da OP).
pub static PROCESSOS_POR_DEPARTAMENTO: LazyLock<BTreeMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        BTreeMap::from([
            (
                "Metalúrgica",
                vec!["Solda", "Ponteamento", "Corte/Fixação", "Serra", "Plasma", "5S"],
            ),
            ("Lavagem Lona", vec!["Lavagem Lona", "5S"]),
            ("Confecção Lona", vec!["Confecção Lona", "5S"]),
            (
                "Logística",
                vec!["Carga e Descarga", "Armazenamento", "Picking"],
            ),
        ])
    });

pub fn maquinas_do_setor(setor: &str) -> Option<&'static [&'static str]> {
    MAQUINAS_POR_SETOR.get(setor).map(|v| v.as_slice())
}

pub fn processos_do_departamento(departamento: &str) -> Option<&'static [&'static str]> {
    PROCESSOS_POR_DEPARTAMENTO.get(departamento).map(|v| v.as_slice())
}

/// Valida se a máquina pertence ao setor informado. Setor desconhecido
/// não restringe (o catálogo cobre só os setores mapeados).
pub fn maquina_valida_para_setor(setor: &str, maquina: &str) -> bool {
    match maquinas_do_setor(setor) {
        Some(maquinas) => maquinas.contains(&maquina),
        None => true,
    }
}

/// Valida se o processo pertence ao departamento informado.
pub fn processo_valido_para_departamento(departamento: &str, processo: &str) -> bool {
    match processos_do_departamento(departamento) {
        Some(processos) => processos.contains(&processo),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maquina_do_setor_correto_passa() {
        assert!(maquina_valida_para_setor("ADM", "ESCRITORIO"));
        assert!(maquina_valida_para_setor(
            "METALURGICA",
            "PLASMA CNC METALIQUE - MT01 (ID: 25)"
        ));
    }

    #[test]
    fn maquina_de_outro_setor_falha() {
        assert!(!maquina_valida_para_setor("ADM", "PREDIAL"));
        assert!(!maquina_valida_para_setor("FACILITIES", "ESCRITORIO"));
    }

    #[test]
    fn setor_fora_do_catalogo_nao_restringe() {
        assert!(maquina_valida_para_setor("SETOR NOVO", "QUALQUER MÁQUINA"));
    }

    #[test]
    fn processo_por_departamento() {
        assert!(processo_valido_para_departamento("Metalúrgica", "Solda"));
        assert!(processo_valido_para_departamento("Logística", "Picking"));
        assert!(!processo_valido_para_departamento("Lavagem Lona", "Solda"));
    }
}
