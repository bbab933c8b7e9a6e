use serde::{Deserialize, Serialize};

use crate::catalog::{CentroCostoId, CuentaId};
use crate::money::Money;

/// One aggregated bucket per (period, account, cost center), as returned by
/// `GET /api/dashboard/estadisticas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub periodo: String,
    pub cuenta_id: CuentaId,
    pub cuenta_nombre: String,
    #[serde(default)]
    pub centro_costo_id: Option<CentroCostoId>,
    #[serde(default)]
    pub centro_costo_nombre: Option<String>,
    #[serde(default)]
    pub conteo: u64,
    pub ingresos: Money,
    pub egresos: Money,
}

impl DashboardStats {
    pub fn balance(&self) -> Money {
        self.ingresos - self.egresos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row_with_null_cost_center() {
        let row: DashboardStats = serde_json::from_str(
            r#"{
                "periodo": "2024-03",
                "cuenta_id": 1,
                "cuenta_nombre": "Bancolombia",
                "centro_costo_id": null,
                "centro_costo_nombre": null,
                "conteo": 12,
                "ingresos": 1500000.0,
                "egresos": 250000
            }"#,
        )
        .unwrap();
        assert_eq!(row.cuenta_id, CuentaId(1));
        assert!(row.centro_costo_id.is_none());
        assert_eq!(row.balance(), Money::from_pesos(1_250_000));
    }
}
