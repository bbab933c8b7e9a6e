use conciliador_core::{CentroCosto, Concepto, Cuenta, Tercero};

use crate::client::ApiClient;
use crate::error::ClientError;

pub struct CatalogosService<'a> {
    api: &'a ApiClient,
}

impl<'a> CatalogosService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn cuentas(&self) -> Result<Vec<Cuenta>, ClientError> {
        self.api.get("/api/catalogos/cuentas", &[]).await
    }

    pub async fn terceros(&self) -> Result<Vec<Tercero>, ClientError> {
        self.api.get("/api/catalogos/terceros", &[]).await
    }

    pub async fn centros_costos(&self) -> Result<Vec<CentroCosto>, ClientError> {
        self.api.get("/api/catalogos/centros-costos", &[]).await
    }

    pub async fn conceptos(&self) -> Result<Vec<Concepto>, ClientError> {
        self.api.get("/api/catalogos/conceptos", &[]).await
    }
}
