//! Narrow data sources the view models depend on. [`ApiClient`] implements
//! them over HTTP; tests substitute in-memory fakes.

use async_trait::async_trait;
use conciliador_client::{ApiClient, ClientError};
use conciliador_core::{
    Comparacion, Conciliacion, ConfigFiltroExclusion, CuentaId, DashboardStats, DateRange, MensajeResultado, Periodo,
};

#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn estadisticas(&self, rango: DateRange) -> Result<Vec<DashboardStats>, ClientError>;
    async fn filtros_exclusion(&self) -> Result<Vec<ConfigFiltroExclusion>, ClientError>;
}

#[async_trait]
pub trait ReconciliationSource: Send + Sync {
    async fn conciliacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError>;
    async fn comparacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Comparacion, ClientError>;
    async fn desvincular_todo(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MensajeResultado, ClientError>;
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn estadisticas(&self, rango: DateRange) -> Result<Vec<DashboardStats>, ClientError> {
        self.dashboard().estadisticas(rango.start, rango.end).await
    }

    async fn filtros_exclusion(&self) -> Result<Vec<ConfigFiltroExclusion>, ClientError> {
        self.config().list_filtros_centros_costos().await
    }
}

#[async_trait]
impl ReconciliationSource for ApiClient {
    async fn conciliacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
        self.conciliaciones().get(cuenta, periodo).await
    }

    async fn comparacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Comparacion, ClientError> {
        self.conciliaciones().comparacion(cuenta, periodo).await
    }

    async fn desvincular_todo(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MensajeResultado, ClientError> {
        self.matching().desvincular_todo(cuenta, periodo).await
    }
}
