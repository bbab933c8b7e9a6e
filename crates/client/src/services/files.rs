use conciliador_core::{AnalisisArchivo, ArchivoLocal, ArchivoSubido, CuentaId, ExtractoArchivo, PaginaResumen, ResultadoOperacion};
use reqwest::multipart::Form;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::upload::FileUpload;

const BASE: &str = "/api/archivos";

#[derive(Debug, Serialize)]
struct ProcesarLocalRequest<'r> {
    ruta: &'r str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cuenta_id: Option<CuentaId>,
}

pub struct FilesService<'a> {
    api: &'a ApiClient,
}

impl<'a> FilesService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn upload(
        &self,
        file: FileUpload,
        cuenta: Option<CuentaId>,
        tipo: Option<&str>,
    ) -> Result<ArchivoSubido, ClientError> {
        let mut form = Form::new().part("file", file.into_part()?);
        if let Some(c) = cuenta {
            form = form.text("cuenta_id", c.to_string());
        }
        if let Some(t) = tipo {
            form = form.text("tipo", t.to_string());
        }
        self.api.post_multipart(&format!("{BASE}/upload"), form).await
    }

    pub async fn analyze(&self, file: FileUpload) -> Result<AnalisisArchivo, ClientError> {
        let form = Form::new().part("file", file.into_part()?);
        self.api.post_multipart(&format!("{BASE}/analizar"), form).await
    }

    /// Lists a directory on the server host; `None` lists the configured root.
    pub async fn list_local_directory(&self, ruta: Option<&str>) -> Result<Vec<ArchivoLocal>, ClientError> {
        let query: Vec<(&str, String)> = ruta.map(|r| ("ruta", r.to_string())).into_iter().collect();
        self.api.get(&format!("{BASE}/directorio"), &query).await
    }

    pub async fn process_local(&self, ruta: &str, cuenta: Option<CuentaId>) -> Result<ResultadoOperacion, ClientError> {
        let body = ProcesarLocalRequest { ruta, cuenta_id: cuenta };
        self.api.post_json(&format!("{BASE}/procesar-local"), &body).await
    }

    pub async fn summary_page(&self, archivo: &str) -> Result<PaginaResumen, ClientError> {
        let query = [("archivo", archivo.to_string())];
        self.api.get(&format!("{BASE}/pagina-resumen"), &query).await
    }

    pub async fn extractos_por_cuenta(&self, cuenta: CuentaId) -> Result<Vec<ExtractoArchivo>, ClientError> {
        self.api.get(&format!("{BASE}/extractos/{cuenta}"), &[]).await
    }

    pub async fn extractos_todos(&self) -> Result<Vec<ExtractoArchivo>, ClientError> {
        self.api.get(&format!("{BASE}/extractos"), &[]).await
    }
}
