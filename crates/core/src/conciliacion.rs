use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::CuentaId;
use crate::error::CoreError;
use crate::money::Money;
use crate::period::Periodo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoConciliacion {
    Pendiente,
    Conciliado,
    ConDiferencias,
    Cerrado,
}

impl fmt::Display for EstadoConciliacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstadoConciliacion::Pendiente => write!(f, "PENDIENTE"),
            EstadoConciliacion::Conciliado => write!(f, "CONCILIADO"),
            EstadoConciliacion::ConDiferencias => write!(f, "CON_DIFERENCIAS"),
            EstadoConciliacion::Cerrado => write!(f, "CERRADO"),
        }
    }
}

impl FromStr for EstadoConciliacion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDIENTE" => Ok(EstadoConciliacion::Pendiente),
            "CONCILIADO" => Ok(EstadoConciliacion::Conciliado),
            "CON_DIFERENCIAS" => Ok(EstadoConciliacion::ConDiferencias),
            "CERRADO" => Ok(EstadoConciliacion::Cerrado),
            other => Err(CoreError::UnknownVariant {
                kind: "estado de conciliacion",
                value: other.to_string(),
            }),
        }
    }
}

/// Traffic-light summary of reconciliation health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Semaforo {
    Verde,
    Amarillo,
    Rojo,
}

impl fmt::Display for Semaforo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semaforo::Verde => write!(f, "VERDE"),
            Semaforo::Amarillo => write!(f, "AMARILLO"),
            Semaforo::Rojo => write!(f, "ROJO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conciliacion {
    #[serde(default)]
    pub id: Option<i64>,
    pub cuenta_id: CuentaId,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub fecha_corte: Option<NaiveDate>,
    #[serde(default)]
    pub saldo_anterior: Money,
    #[serde(default)]
    pub entradas_extracto: Money,
    #[serde(default)]
    pub salidas_extracto: Money,
    #[serde(default)]
    pub saldo_final_extracto: Money,
    #[serde(default)]
    pub entradas_sistema: Money,
    #[serde(default)]
    pub salidas_sistema: Money,
    #[serde(default)]
    pub saldo_final_sistema: Money,
    #[serde(default)]
    pub diferencia: Money,
    pub estado: EstadoConciliacion,
    pub semaforo: Semaforo,
    #[serde(default)]
    pub datos_extra: Option<serde_json::Value>,
}

impl Conciliacion {
    pub fn periodo(&self) -> Result<Periodo, CoreError> {
        Periodo::new(self.year, self.month)
    }

    pub fn is_closed(&self) -> bool {
        self.estado == EstadoConciliacion::Cerrado
    }
}

/// Writable subset of [`Conciliacion`] sent on create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConciliacionUpdate {
    pub cuenta_id: CuentaId,
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_corte: Option<NaiveDate>,
    pub saldo_anterior: Money,
    pub entradas: Money,
    pub salidas: Money,
    pub saldo_final: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datos_extra: Option<serde_json::Value>,
}

impl ConciliacionUpdate {
    pub fn new(cuenta_id: CuentaId, periodo: Periodo) -> Self {
        ConciliacionUpdate {
            cuenta_id,
            year: periodo.year(),
            month: periodo.month(),
            fecha_corte: None,
            saldo_anterior: Money::zero(),
            entradas: Money::zero(),
            salidas: Money::zero(),
            saldo_final: Money::zero(),
            datos_extra: None,
        }
    }

    /// Statement figures as currently stored in a reconciliation record.
    pub fn from_conciliacion(c: &Conciliacion) -> Self {
        ConciliacionUpdate {
            cuenta_id: c.cuenta_id,
            year: c.year,
            month: c.month,
            fecha_corte: c.fecha_corte,
            saldo_anterior: c.saldo_anterior,
            entradas: c.entradas_extracto,
            salidas: c.salidas_extracto,
            saldo_final: c.saldo_final_extracto,
            datos_extra: c.datos_extra.clone(),
        }
    }

    /// Closing balance implied by opening balance and flows.
    pub fn saldo_calculado(&self) -> Money {
        self.saldo_anterior + self.entradas - self.salidas
    }
}

/// Totals of one side (statement or ledger) of a comparison report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumenFuente {
    #[serde(default)]
    pub saldo_inicial: Money,
    #[serde(default)]
    pub entradas: Money,
    #[serde(default)]
    pub salidas: Money,
    #[serde(default)]
    pub saldo_final: Money,
    #[serde(default)]
    pub movimientos: u64,
}

/// Statement-vs-ledger comparison report for one account and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparacion {
    pub cuenta_id: CuentaId,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub extracto: ResumenFuente,
    #[serde(default)]
    pub sistema: ResumenFuente,
    #[serde(default)]
    pub diferencia: Money,
    #[serde(default)]
    pub vinculados: u64,
    #[serde(default)]
    pub sin_vincular_extracto: u64,
    #[serde(default)]
    pub sin_vincular_sistema: u64,
    #[serde(default)]
    pub semaforo: Option<Semaforo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 9,
            "cuenta_id": 5,
            "year": 2024,
            "month": 3,
            "fecha_corte": "2024-03-31",
            "saldo_anterior": 1000,
            "entradas_extracto": 500,
            "salidas_extracto": 200,
            "saldo_final_extracto": 1300,
            "entradas_sistema": 450,
            "salidas_sistema": 200,
            "saldo_final_sistema": 1250,
            "diferencia": 50,
            "estado": "CON_DIFERENCIAS",
            "semaforo": "AMARILLO"
        }"#
    }

    #[test]
    fn decodes_conciliacion() {
        let c: Conciliacion = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(c.cuenta_id, CuentaId(5));
        assert_eq!(c.estado, EstadoConciliacion::ConDiferencias);
        assert_eq!(c.semaforo, Semaforo::Amarillo);
        assert_eq!(c.periodo().unwrap(), Periodo::new(2024, 3).unwrap());
        assert!(!c.is_closed());
    }

    #[test]
    fn update_from_record_uses_statement_side() {
        let c: Conciliacion = serde_json::from_str(sample_json()).unwrap();
        let u = ConciliacionUpdate::from_conciliacion(&c);
        assert_eq!(u.entradas, Money::from_pesos(500));
        assert_eq!(u.saldo_final, Money::from_pesos(1300));
        assert_eq!(u.saldo_calculado(), Money::from_pesos(1300));
    }

    #[test]
    fn update_omits_absent_optionals() {
        let u = ConciliacionUpdate::new(CuentaId(1), Periodo::new(2024, 1).unwrap());
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("fecha_corte").is_none());
        assert!(json.get("datos_extra").is_none());
        assert_eq!(json["month"], 1);
    }

    #[test]
    fn estado_round_trips_through_strings() {
        assert_eq!("CERRADO".parse::<EstadoConciliacion>().unwrap(), EstadoConciliacion::Cerrado);
        assert_eq!(EstadoConciliacion::ConDiferencias.to_string(), "CON_DIFERENCIAS");
        assert!("ABIERTO".parse::<EstadoConciliacion>().is_err());
    }

    #[test]
    fn semaforo_wire_names() {
        assert_eq!(serde_json::to_string(&Semaforo::Rojo).unwrap(), "\"ROJO\"");
        let s: Semaforo = serde_json::from_str("\"VERDE\"").unwrap();
        assert_eq!(s, Semaforo::Verde);
    }
}
