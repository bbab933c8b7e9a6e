use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstadoSistema {
    pub estado: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub detalles: Option<serde_json::Value>,
}

impl EstadoSistema {
    pub fn is_ok(&self) -> bool {
        matches!(self.estado.to_lowercase().as_str(), "ok" | "healthy")
    }
}

/// Outcome of an administrative batch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultadoOperacion {
    #[serde(alias = "message")]
    pub mensaje: String,
    #[serde(default)]
    pub afectados: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estado_ok_is_case_insensitive() {
        let e: EstadoSistema = serde_json::from_str(r#"{"estado": "OK", "version": "1.4.0"}"#).unwrap();
        assert!(e.is_ok());
    }
}
