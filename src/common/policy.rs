// src/common/policy.rs
//
// Fonte única de verdade para as permissões por papel. Toda checagem de
// acesso do sistema passa por aqui, nunca por comparação de string solta.

use crate::models::auth::Papel;

/// Quem pode editar CADASTRO da OS (cliente, datas, escopo, endereços):
/// apenas Admin e Gerente. Compras e Operador NÃO editam isso.
pub fn pode_editar_geral(papel: Papel) -> bool {
    matches!(papel, Papel::Admin | Papel::Gerente)
}

/// Quem pode VER valores financeiros: Admin, Gerente e Compras.
pub fn pode_ver_valores(papel: Papel) -> bool {
    matches!(papel, Papel::Admin | Papel::Gerente | Papel::Compras)
}

/// Quem pode editar o valor PREVISTO das despesas.
/// Compras não pode (ele só lança o realizado).
pub fn pode_editar_previsto(papel: Papel) -> bool {
    matches!(papel, Papel::Admin | Papel::Gerente)
}

/// Quem pode aprovar pedidos de compra acima do limite de alçada.
pub fn pode_aprovar_acima_da_alcada(papel: Papel) -> bool {
    matches!(papel, Papel::Admin | Papel::Gerente)
}

pub fn eh_admin(papel: Papel) -> bool {
    matches!(papel, Papel::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matriz_de_permissoes_por_papel() {
        // (papel, editar_geral, ver_valores, editar_previsto, aprovar_alcada)
        let casos = [
            (Papel::Operador, false, false, false, false),
            (Papel::Compras, false, true, false, false),
            (Papel::Gerente, true, true, true, true),
            (Papel::Admin, true, true, true, true),
        ];
        for (papel, geral, valores, previsto, alcada) in casos {
            assert_eq!(pode_editar_geral(papel), geral, "editar_geral de {:?}", papel);
            assert_eq!(pode_ver_valores(papel), valores, "ver_valores de {:?}", papel);
            assert_eq!(pode_editar_previsto(papel), previsto, "editar_previsto de {:?}", papel);
            assert_eq!(
                pode_aprovar_acima_da_alcada(papel),
                alcada,
                "aprovar_alcada de {:?}",
                papel
            );
        }
    }

    #[test]
    fn somente_admin_eh_admin() {
        assert!(eh_admin(Papel::Admin));
        assert!(!eh_admin(Papel::Gerente));
        assert!(!eh_admin(Papel::Compras));
        assert!(!eh_admin(Papel::Operador));
    }
}
