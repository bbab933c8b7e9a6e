//! One handle per backend service. Handles borrow the [`ApiClient`](crate::ApiClient)
//! and map each operation to exactly one HTTP call.

mod admin;
mod catalogos;
mod conciliaciones;
mod config;
mod dashboard;
mod extractores;
mod files;
mod matching;
mod movimientos;

pub use admin::AdminService;
pub use catalogos::CatalogosService;
pub use conciliaciones::ConciliacionesService;
pub use config::ConfigService;
pub use dashboard::DashboardService;
pub use extractores::ExtractoresService;
pub use files::FilesService;
pub use matching::MatchingService;
pub use movimientos::MovimientosService;

use conciliador_core::{CuentaId, Periodo};

/// `{prefix}/{cuenta}/{year}/{month}`
pub(crate) fn period_path(prefix: &str, cuenta: CuentaId, periodo: Periodo) -> String {
    format!("{prefix}/{cuenta}/{}/{}", periodo.year(), periodo.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_path_has_unpadded_month() {
        let p = Periodo::new(2024, 3).unwrap();
        assert_eq!(period_path("/api/conciliaciones", CuentaId(5), p), "/api/conciliaciones/5/2024/3");
    }
}
