use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{CentroCostoId, ConceptoId, CuentaId, TerceroId};
use crate::money::Money;
use crate::period::DateRange;

/// One bank-statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovimientoExtracto {
    #[serde(default)]
    pub id: Option<i64>,
    pub fecha: NaiveDate,
    pub descripcion: String,
    #[serde(default)]
    pub referencia: Option<String>,
    pub valor: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trm: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_linea: Option<u32>,
}

impl MovimientoExtracto {
    pub fn is_inflow(&self) -> bool {
        !self.valor.is_negative()
    }
}

/// A ledger movement as booked in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movimiento {
    pub id: i64,
    pub fecha: NaiveDate,
    pub descripcion: String,
    #[serde(default)]
    pub referencia: Option<String>,
    pub valor: Money,
    pub cuenta_id: CuentaId,
    #[serde(default)]
    pub tercero_id: Option<TerceroId>,
    #[serde(default)]
    pub centro_costo_id: Option<CentroCostoId>,
    #[serde(default)]
    pub concepto_id: Option<ConceptoId>,
    #[serde(default)]
    pub usd: Option<Money>,
    #[serde(default)]
    pub trm: Option<Money>,
    #[serde(default)]
    pub conciliado: bool,
}

/// Classification changes for one movement. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovimientoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tercero_id: Option<TerceroId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centro_costo_id: Option<CentroCostoId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concepto_id: Option<ConceptoId>,
}

impl MovimientoUpdate {
    pub fn is_empty(&self) -> bool {
        self.descripcion.is_none()
            && self.tercero_id.is_none()
            && self.centro_costo_id.is_none()
            && self.concepto_id.is_none()
    }
}

/// Query for the movements listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovimientoFiltro {
    pub rango: Option<DateRange>,
    pub cuenta_id: Option<CuentaId>,
    pub tercero_id: Option<TerceroId>,
    pub centro_costo_id: Option<CentroCostoId>,
    pub concepto_id: Option<ConceptoId>,
    pub busqueda: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl MovimientoFiltro {
    /// Query-string pairs; unset fields are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(r) = self.rango {
            q.push(("desde", r.start.to_string()));
            q.push(("hasta", r.end.to_string()));
        }
        if let Some(id) = self.cuenta_id {
            q.push(("cuenta_id", id.to_string()));
        }
        if let Some(id) = self.tercero_id {
            q.push(("tercero_id", id.to_string()));
        }
        if let Some(id) = self.centro_costo_id {
            q.push(("centro_costo_id", id.to_string()));
        }
        if let Some(id) = self.concepto_id {
            q.push(("concepto_id", id.to_string()));
        }
        if let Some(text) = self.busqueda.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            q.push(("busqueda", text.to_string()));
        }
        if let Some(skip) = self.skip {
            q.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            q.push(("limit", limit.to_string()));
        }
        q
    }
}
