use conciliador_core::{ConfigFiltroExclusion, CuentaId, Periodo, ReglaClasificacion, ValorPendiente};

use crate::client::ApiClient;
use crate::error::ClientError;

const REGLAS: &str = "/api/reglas";
const FILTROS: &str = "/api/config/filtros-centros-costos";
const PENDIENTES: &str = "/api/config/valores-pendientes";

/// Rules, cost-center filters and pending values. Each follows the same
/// list/create/update/delete shape.
pub struct ConfigService<'a> {
    api: &'a ApiClient,
}

impl<'a> ConfigService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    // ── Reglas ───────────────────────────────────────────────────────────────

    pub async fn list_reglas(&self) -> Result<Vec<ReglaClasificacion>, ClientError> {
        self.api.get(REGLAS, &[]).await
    }

    pub async fn create_regla(&self, regla: &ReglaClasificacion) -> Result<ReglaClasificacion, ClientError> {
        regla.validate()?;
        self.api.post_json(REGLAS, regla).await
    }

    pub async fn update_regla(&self, id: i64, regla: &ReglaClasificacion) -> Result<ReglaClasificacion, ClientError> {
        regla.validate()?;
        self.api.put_json(&format!("{REGLAS}/{id}"), regla).await
    }

    pub async fn delete_regla(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("{REGLAS}/{id}")).await
    }

    // ── Filtros de centros de costo ──────────────────────────────────────────

    pub async fn list_filtros_centros_costos(&self) -> Result<Vec<ConfigFiltroExclusion>, ClientError> {
        self.api.get(FILTROS, &[]).await
    }

    pub async fn create_filtro_centro_costo(
        &self,
        filtro: &ConfigFiltroExclusion,
    ) -> Result<ConfigFiltroExclusion, ClientError> {
        self.api.post_json(FILTROS, filtro).await
    }

    pub async fn update_filtro_centro_costo(
        &self,
        id: i64,
        filtro: &ConfigFiltroExclusion,
    ) -> Result<ConfigFiltroExclusion, ClientError> {
        self.api.put_json(&format!("{FILTROS}/{id}"), filtro).await
    }

    pub async fn delete_filtro_centro_costo(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("{FILTROS}/{id}")).await
    }

    // ── Valores pendientes ───────────────────────────────────────────────────

    pub async fn list_valores_pendientes(
        &self,
        cuenta: Option<CuentaId>,
        periodo: Option<Periodo>,
    ) -> Result<Vec<ValorPendiente>, ClientError> {
        let mut query = Vec::new();
        if let Some(c) = cuenta {
            query.push(("cuenta_id", c.to_string()));
        }
        if let Some(p) = periodo {
            query.push(("year", p.year().to_string()));
            query.push(("month", p.month().to_string()));
        }
        self.api.get(PENDIENTES, &query).await
    }

    pub async fn create_valor_pendiente(&self, valor: &ValorPendiente) -> Result<ValorPendiente, ClientError> {
        Periodo::new(valor.year, valor.month)?;
        self.api.post_json(PENDIENTES, valor).await
    }

    pub async fn update_valor_pendiente(&self, id: i64, valor: &ValorPendiente) -> Result<ValorPendiente, ClientError> {
        Periodo::new(valor.year, valor.month)?;
        self.api.put_json(&format!("{PENDIENTES}/{id}"), valor).await
    }

    pub async fn delete_valor_pendiente(&self, id: i64) -> Result<(), ClientError> {
        self.api.delete(&format!("{PENDIENTES}/{id}")).await
    }
}
