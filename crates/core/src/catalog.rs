use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

id_type!(CuentaId);
id_type!(TerceroId);
id_type!(CentroCostoId);
id_type!(ConceptoId);

/// Bank or cash account movements are booked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuenta {
    pub id: CuentaId,
    pub nombre: String,
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub moneda: Option<String>,
    #[serde(default = "default_true")]
    pub activa: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tercero {
    pub id: TerceroId,
    pub nombre: String,
    #[serde(default)]
    pub nit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroCosto {
    pub id: CentroCostoId,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concepto {
    pub id: ConceptoId,
    pub nombre: String,
    #[serde(default)]
    pub grupo: Option<String>,
}

pub(crate) fn default_true() -> bool {
    true
}
