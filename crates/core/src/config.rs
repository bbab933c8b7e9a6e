use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{default_true, CentroCostoId, CuentaId};
use crate::money::Money;

/// Whether a cost center is left out of dashboard totals by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFiltroExclusion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub centro_costo_id: CentroCostoId,
    #[serde(default)]
    pub centro_costo_nombre: Option<String>,
    #[serde(default)]
    pub excluido_por_defecto: bool,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// Cost centers that start out excluded: active entries flagged by default.
pub fn default_exclusions(config: &[ConfigFiltroExclusion]) -> HashSet<CentroCostoId> {
    config
        .iter()
        .filter(|c| c.activo && c.excluido_por_defecto)
        .map(|c| c.centro_costo_id)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoValorPendiente {
    PorCobrar,
    PorPagar,
}

/// A known pending amount carried into a period's reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValorPendiente {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub cuenta_id: CuentaId,
    pub year: i32,
    pub month: u32,
    pub descripcion: String,
    pub valor: Money,
    pub tipo: TipoValorPendiente,
}
