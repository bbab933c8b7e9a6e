use serde::{Deserialize, Serialize};

use crate::catalog::CuentaId;
use crate::money::Money;
use crate::movement::MovimientoExtracto;

/// Server acknowledgement of an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivoSubido {
    #[serde(default)]
    pub id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub ruta: Option<String>,
    #[serde(default)]
    pub tamano: Option<u64>,
    #[serde(default)]
    pub cuenta_id: Option<CuentaId>,
    #[serde(default)]
    pub mensaje: Option<String>,
}

/// Result of analysing a file without storing its movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalisisArchivo {
    pub nombre: String,
    #[serde(default)]
    pub tipo_detectado: Option<String>,
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub cuenta_id: Option<CuentaId>,
    #[serde(default)]
    pub paginas: Option<u32>,
    #[serde(default)]
    pub movimientos: Vec<MovimientoExtracto>,
    #[serde(default)]
    pub advertencias: Vec<String>,
}

/// Entry of a server-side directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivoLocal {
    pub nombre: String,
    pub ruta: String,
    #[serde(default)]
    pub tamano: Option<u64>,
    #[serde(default)]
    pub es_directorio: bool,
    #[serde(default)]
    pub modificado: Option<String>,
}

/// Page of a statement file holding its balance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginaResumen {
    pub archivo: String,
    #[serde(default)]
    pub pagina: Option<u32>,
    #[serde(default)]
    pub texto: Option<String>,
}

/// Statement file already loaded for an account and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractoArchivo {
    #[serde(default)]
    pub id: Option<i64>,
    pub cuenta_id: CuentaId,
    #[serde(default)]
    pub cuenta_nombre: Option<String>,
    pub year: i32,
    pub month: u32,
    pub nombre_archivo: String,
    #[serde(default)]
    pub fecha_carga: Option<String>,
}

/// Bank statement extractor known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extractor {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub formatos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeteccionExtractor {
    #[serde(default)]
    pub extractor_id: Option<String>,
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub confianza: Option<f32>,
}

impl DeteccionExtractor {
    pub fn is_detected(&self) -> bool {
        self.extractor_id.is_some()
    }
}

/// Parsed statement preview returned by `analizar-extracto` and `cargar-extracto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalisisExtracto {
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub saldo_anterior: Option<Money>,
    #[serde(default)]
    pub entradas: Option<Money>,
    #[serde(default)]
    pub salidas: Option<Money>,
    #[serde(default)]
    pub saldo_final: Option<Money>,
    #[serde(default)]
    pub movimientos: Vec<MovimientoExtracto>,
    #[serde(default)]
    pub advertencias: Vec<String>,
    #[serde(default)]
    pub mensaje: Option<String>,
}

impl AnalisisExtracto {
    /// Sum of parsed line values, for checking against the declared flows.
    pub fn total_movimientos(&self) -> Money {
        self.movimientos.iter().map(|m| m.valor).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analisis_extracto_totals_lines() {
        let a: AnalisisExtracto = serde_json::from_str(
            r#"{
                "banco": "BANCOLOMBIA",
                "year": 2024,
                "month": 3,
                "movimientos": [
                    {"fecha": "2024-03-01", "descripcion": "ABONO", "valor": 1000},
                    {"fecha": "2024-03-02", "descripcion": "CUOTA", "valor": -250}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(a.total_movimientos(), Money::from_pesos(750));
        assert!(a.advertencias.is_empty());
    }

    #[test]
    fn deteccion_without_extractor_is_not_detected() {
        let d: DeteccionExtractor = serde_json::from_str(r#"{"banco": null}"#).unwrap();
        assert!(!d.is_detected());
    }
}
