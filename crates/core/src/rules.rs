use serde::{Deserialize, Serialize};

use crate::catalog::{CentroCostoId, ConceptoId, CuentaId, TerceroId};
use crate::error::CoreError;

/// How a rule pattern is compared against a movement description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoPatron {
    #[default]
    Contiene,
    Exacto,
    Regex,
}

impl std::str::FromStr for TipoPatron {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contiene" | "contains" => Ok(TipoPatron::Contiene),
            "exacto" | "exact" => Ok(TipoPatron::Exacto),
            "regex" => Ok(TipoPatron::Regex),
            other => Err(CoreError::UnknownVariant {
                kind: "tipo de patron",
                value: other.to_string(),
            }),
        }
    }
}

/// Classification rule managed through `/api/reglas`. Matching itself runs on
/// the backend; the client only validates before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReglaClasificacion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nombre: String,
    pub patron: String,
    #[serde(default)]
    pub tipo_patron: TipoPatron,
    #[serde(default)]
    pub prioridad: i32,
    #[serde(default)]
    pub cuenta_id: Option<CuentaId>,
    #[serde(default)]
    pub tercero_id: Option<TerceroId>,
    #[serde(default)]
    pub centro_costo_id: Option<CentroCostoId>,
    #[serde(default)]
    pub concepto_id: Option<ConceptoId>,
    #[serde(default = "crate::catalog::default_true")]
    pub activa: bool,
}

impl ReglaClasificacion {
    pub fn new(nombre: &str, patron: &str, tipo_patron: TipoPatron) -> Self {
        ReglaClasificacion {
            id: None,
            nombre: nombre.to_string(),
            patron: patron.to_string(),
            tipo_patron,
            prioridad: 0,
            cuenta_id: None,
            tercero_id: None,
            centro_costo_id: None,
            concepto_id: None,
            activa: true,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.patron.trim().is_empty() {
            return Err(CoreError::EmptyPattern);
        }
        if self.tipo_patron == TipoPatron::Regex {
            regex::Regex::new(&self.patron).map_err(|e| CoreError::InvalidRegex {
                pattern: self.patron.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_patron_parses_spanish_and_english() {
        assert_eq!("CONTIENE".parse::<TipoPatron>().unwrap(), TipoPatron::Contiene);
        assert_eq!("exact".parse::<TipoPatron>().unwrap(), TipoPatron::Exacto);
        assert_eq!("Regex".parse::<TipoPatron>().unwrap(), TipoPatron::Regex);
        assert!("fuzzy".parse::<TipoPatron>().is_err());
    }

    #[test]
    fn validate_rejects_blank_pattern() {
        let r = ReglaClasificacion::new("vacia", "   ", TipoPatron::Contiene);
        assert_eq!(r.validate(), Err(CoreError::EmptyPattern));
    }

    #[test]
    fn validate_compiles_regex() {
        assert!(ReglaClasificacion::new("gmf", r"^GMF\s+4X1000", TipoPatron::Regex)
            .validate()
            .is_ok());
        let bad = ReglaClasificacion::new("rota", "(abc", TipoPatron::Regex);
        assert!(matches!(bad.validate(), Err(CoreError::InvalidRegex { .. })));
    }

    #[test]
    fn invalid_regex_text_is_fine_for_contains() {
        assert!(ReglaClasificacion::new("literal", "(abc", TipoPatron::Contiene)
            .validate()
            .is_ok());
    }

    #[test]
    fn new_rule_serializes_without_id() {
        let r = ReglaClasificacion::new("nomina", "NOMINA", TipoPatron::Contiene);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["tipo_patron"], "CONTIENE");
    }
}
