use conciliador_core::{
    AnalisisExtracto, Comparacion, Conciliacion, ConciliacionUpdate, CuentaId, Movimiento, MovimientoExtracto,
    Periodo,
};

use super::period_path;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::upload::ExtractoUpload;

const BASE: &str = "/api/conciliaciones";

pub struct ConciliacionesService<'a> {
    api: &'a ApiClient,
}

impl<'a> ConciliacionesService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
        self.api.get(&period_path(BASE, cuenta, periodo), &[]).await
    }

    /// All reconciliation records of one account, newest period first as sent by the server.
    pub async fn list_by_cuenta(&self, cuenta: CuentaId) -> Result<Vec<Conciliacion>, ClientError> {
        self.api.get(&format!("{BASE}/{cuenta}"), &[]).await
    }

    /// Creates or updates the record for `update`'s account and period.
    pub async fn save(&self, update: &ConciliacionUpdate) -> Result<Conciliacion, ClientError> {
        Periodo::new(update.year, update.month)?;
        self.api.post_json(&format!("{BASE}/"), update).await
    }

    pub async fn recalcular(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
        let path = format!("{}/recalcular", period_path(BASE, cuenta, periodo));
        self.api.post_empty(&path).await
    }

    pub async fn cerrar(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Conciliacion, ClientError> {
        let path = format!("{}/cerrar", period_path(BASE, cuenta, periodo));
        self.api.post_empty(&path).await
    }

    pub async fn comparacion(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Comparacion, ClientError> {
        let path = format!("{}/comparacion", period_path(BASE, cuenta, periodo));
        self.api.get(&path, &[]).await
    }

    pub async fn movimientos_extracto(
        &self,
        cuenta: CuentaId,
        periodo: Periodo,
    ) -> Result<Vec<MovimientoExtracto>, ClientError> {
        let path = format!("{}/movimientos-extracto", period_path(BASE, cuenta, periodo));
        self.api.get(&path, &[]).await
    }

    pub async fn movimientos_sistema(&self, cuenta: CuentaId, periodo: Periodo) -> Result<Vec<Movimiento>, ClientError> {
        let path = format!("{}/movimientos-sistema", period_path(BASE, cuenta, periodo));
        self.api.get(&path, &[]).await
    }

    /// Parses a statement without persisting it.
    pub async fn analizar_extracto(&self, upload: ExtractoUpload) -> Result<AnalisisExtracto, ClientError> {
        tracing::info!(cuenta = %upload.cuenta_id, archivo = %upload.archivo.nombre, "Analizando extracto");
        self.api
            .post_multipart(&format!("{BASE}/analizar-extracto"), upload.into_form()?)
            .await
    }

    /// Parses and stores a statement, with optional overrides and confirmed rows.
    pub async fn cargar_extracto(&self, upload: ExtractoUpload) -> Result<AnalisisExtracto, ClientError> {
        tracing::info!(cuenta = %upload.cuenta_id, archivo = %upload.archivo.nombre, "Cargando extracto");
        self.api
            .post_multipart(&format!("{BASE}/cargar-extracto"), upload.into_form()?)
            .await
    }
}
