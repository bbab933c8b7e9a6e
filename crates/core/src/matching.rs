use serde::{Deserialize, Serialize};

use crate::catalog::CuentaId;
use crate::movement::{Movimiento, MovimientoExtracto};
use crate::period::Periodo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoMatch {
    Exacto,
    Aproximado,
    Manual,
}

/// A link between a statement line and a ledger movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vinculacion {
    pub id: i64,
    pub movimiento_extracto_id: i64,
    pub movimiento_id: i64,
    pub tipo_match: TipoMatch,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstadisticasMatching {
    #[serde(default)]
    pub total_extracto: u64,
    #[serde(default)]
    pub total_sistema: u64,
    #[serde(default)]
    pub vinculados: u64,
    #[serde(default)]
    pub exactos: u64,
    #[serde(default)]
    pub aproximados: u64,
    #[serde(default)]
    pub manuales: u64,
}

impl EstadisticasMatching {
    pub fn sin_vincular_extracto(&self) -> u64 {
        self.total_extracto.saturating_sub(self.vinculados)
    }

    pub fn sin_vincular_sistema(&self) -> u64 {
        self.total_sistema.saturating_sub(self.vinculados)
    }
}

/// Matching state of one account and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResultado {
    #[serde(default)]
    pub vinculaciones: Vec<Vinculacion>,
    #[serde(default)]
    pub extracto_sin_vincular: Vec<MovimientoExtracto>,
    #[serde(default)]
    pub sistema_sin_vincular: Vec<Movimiento>,
    #[serde(default)]
    pub estadisticas: EstadisticasMatching,
}

/// Body of `POST /api/matching/desvincular-todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesvincularTodoRequest {
    pub cuenta_id: CuentaId,
    pub year: i32,
    pub month: u32,
}

impl DesvincularTodoRequest {
    pub fn new(cuenta_id: CuentaId, periodo: Periodo) -> Self {
        DesvincularTodoRequest {
            cuenta_id,
            year: periodo.year(),
            month: periodo.month(),
        }
    }
}

/// Body of `POST /api/matching/vincular`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VincularRequest {
    pub movimiento_extracto_id: i64,
    pub movimiento_id: i64,
}

/// Human-readable outcome returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MensajeResultado {
    #[serde(alias = "message")]
    pub mensaje: String,
}
