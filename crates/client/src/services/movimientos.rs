use conciliador_core::{Movimiento, MovimientoFiltro, MovimientoUpdate};

use crate::client::ApiClient;
use crate::error::ClientError;

const BASE: &str = "/api/movimientos";

pub struct MovimientosService<'a> {
    api: &'a ApiClient,
}

impl<'a> MovimientosService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filtro: &MovimientoFiltro) -> Result<Vec<Movimiento>, ClientError> {
        self.api.get(BASE, &filtro.to_query()).await
    }

    pub async fn get(&self, id: i64) -> Result<Movimiento, ClientError> {
        self.api.get(&format!("{BASE}/{id}"), &[]).await
    }

    pub async fn update(&self, id: i64, changes: &MovimientoUpdate) -> Result<Movimiento, ClientError> {
        if changes.is_empty() {
            tracing::debug!(id, "Empty movement update, sending anyway");
        }
        self.api.put_json(&format!("{BASE}/{id}"), changes).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("{BASE}/{id}")).await
    }
}
