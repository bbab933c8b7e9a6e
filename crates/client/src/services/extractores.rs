use conciliador_core::{DeteccionExtractor, Extractor};
use reqwest::multipart::Form;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::upload::FileUpload;

pub struct ExtractoresService<'a> {
    api: &'a ApiClient,
}

impl<'a> ExtractoresService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Extractor>, ClientError> {
        self.api.get("/api/extractores", &[]).await
    }

    /// Asks the backend which extractor recognises `file`.
    pub async fn detect(&self, file: FileUpload) -> Result<DeteccionExtractor, ClientError> {
        let form = Form::new().part("file", file.into_part()?);
        self.api.post_multipart("/api/extractores/detectar", form).await
    }
}
