pub mod admin;
pub mod catalog;
pub mod conciliacion;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod files;
pub mod matching;
pub mod money;
pub mod movement;
pub mod period;
pub mod rules;

pub use admin::{EstadoSistema, ResultadoOperacion};
pub use catalog::{CentroCosto, CentroCostoId, Concepto, ConceptoId, Cuenta, CuentaId, Tercero, TerceroId};
pub use conciliacion::{Comparacion, Conciliacion, ConciliacionUpdate, EstadoConciliacion, ResumenFuente, Semaforo};
pub use config::{default_exclusions, ConfigFiltroExclusion, TipoValorPendiente, ValorPendiente};
pub use dashboard::DashboardStats;
pub use error::CoreError;
pub use files::{
    AnalisisArchivo, AnalisisExtracto, ArchivoLocal, ArchivoSubido, DeteccionExtractor, ExtractoArchivo,
    Extractor, PaginaResumen,
};
pub use matching::{
    DesvincularTodoRequest, EstadisticasMatching, MatchingResultado, MensajeResultado, TipoMatch, Vinculacion,
    VincularRequest,
};
pub use money::{format_axis_thousands, Money};
pub use movement::{Movimiento, MovimientoExtracto, MovimientoFiltro, MovimientoUpdate};
pub use period::{DateRange, Periodo};
pub use rules::{ReglaClasificacion, TipoPatron};
