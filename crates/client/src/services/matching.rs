use conciliador_core::{
    CuentaId, DesvincularTodoRequest, MatchingResultado, MensajeResultado, Periodo, Vinculacion, VincularRequest,
};

use super::period_path;
use crate::client::ApiClient;
use crate::error::ClientError;

const BASE: &str = "/api/matching";

pub struct MatchingService<'a> {
    api: &'a ApiClient,
}

impl<'a> MatchingService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MatchingResultado, ClientError> {
        self.api.get(&period_path(BASE, cuenta, periodo), &[]).await
    }

    /// Runs automatic matching for the period on the backend.
    pub async fn ejecutar(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MatchingResultado, ClientError> {
        let path = format!("{}/ejecutar", period_path(BASE, cuenta, periodo));
        self.api.post_empty(&path).await
    }

    /// Removes every link of the period. Irreversible.
    pub async fn desvincular_todo(&self, cuenta: CuentaId, periodo: Periodo) -> Result<MensajeResultado, ClientError> {
        let body = DesvincularTodoRequest::new(cuenta, periodo);
        tracing::info!(%cuenta, %periodo, "Desvinculando todos los movimientos");
        self.api.post_json(&format!("{BASE}/desvincular-todo"), &body).await
    }

    /// Manually links a statement line to a ledger movement.
    pub async fn vincular(&self, movimiento_extracto_id: i64, movimiento_id: i64) -> Result<Vinculacion, ClientError> {
        let body = VincularRequest {
            movimiento_extracto_id,
            movimiento_id,
        };
        self.api.post_json(&format!("{BASE}/vincular"), &body).await
    }

    pub async fn desvincular(&self, vinculacion_id: i64) -> Result<MensajeResultado, ClientError> {
        self.api
            .delete_with(&format!("{BASE}/vinculaciones/{vinculacion_id}"))
            .await
    }
}
