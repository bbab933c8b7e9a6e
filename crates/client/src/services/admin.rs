use conciliador_core::{CuentaId, EstadoSistema, Periodo, ResultadoOperacion};
use serde_json::json;

use crate::client::ApiClient;
use crate::error::ClientError;

const BASE: &str = "/api/admin";

pub struct AdminService<'a> {
    api: &'a ApiClient,
}

impl<'a> AdminService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn estado(&self) -> Result<EstadoSistema, ClientError> {
        self.api.get(&format!("{BASE}/estado"), &[]).await
    }

    /// Asks the backend to rebuild running balances of one account.
    pub async fn recalcular_saldos(&self, cuenta: CuentaId) -> Result<ResultadoOperacion, ClientError> {
        let body = json!({ "cuenta_id": cuenta });
        self.api.post_json(&format!("{BASE}/recalcular-saldos"), &body).await
    }

    /// Re-runs rule classification over a period's movements.
    pub async fn reclasificar(&self, cuenta: CuentaId, periodo: Periodo) -> Result<ResultadoOperacion, ClientError> {
        let body = json!({ "cuenta_id": cuenta, "year": periodo.year(), "month": periodo.month() });
        self.api.post_json(&format!("{BASE}/reclasificar"), &body).await
    }
}
