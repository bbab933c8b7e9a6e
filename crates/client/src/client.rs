use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::services::{
    AdminService, CatalogosService, ConciliacionesService, ConfigService, DashboardService, ExtractoresService,
    FilesService, MatchingService, MovimientosService,
};

/// Connection to the reconciliation backend. Cheap to clone; every service
/// handle borrows it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }

    pub fn conciliaciones(&self) -> ConciliacionesService<'_> {
        ConciliacionesService::new(self)
    }

    pub fn matching(&self) -> MatchingService<'_> {
        MatchingService::new(self)
    }

    pub fn config(&self) -> ConfigService<'_> {
        ConfigService::new(self)
    }

    pub fn files(&self) -> FilesService<'_> {
        FilesService::new(self)
    }

    pub fn extractores(&self) -> ExtractoresService<'_> {
        ExtractoresService::new(self)
    }

    pub fn movimientos(&self) -> MovimientosService<'_> {
        MovimientosService::new(self)
    }

    pub fn catalogos(&self) -> CatalogosService<'_> {
        CatalogosService::new(self)
    }

    pub fn admin(&self) -> AdminService<'_> {
        AdminService::new(self)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "API request");
        self.http.request(method, url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self.request(Method::GET, path).query(query).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.request(Method::POST, path).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(Method::PUT, path).json(body).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let resp = self.request(Method::DELETE, path).send().await?;
        handle_empty_response(resp).await
    }

    pub(crate) async fn delete_with<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.request(Method::DELETE, path).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ClientError> {
        let resp = self.request(Method::POST, path).multipart(form).send().await?;
        handle_response(resp).await
    }
}

/// Shared response handling: non-success statuses become [`ClientError::Api`]
/// carrying the server's detail; success bodies decode into `T`. An empty
/// body decodes as JSON `null`, so `()` and `Option<_>` accept it.
pub async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let url = resp.url().clone();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let detail = error_detail(&bytes).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        tracing::warn!(status = status.as_u16(), %url, "API error: {detail}");
        return Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    decode_body(&bytes)
}

async fn handle_empty_response(resp: Response) -> Result<(), ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = resp.bytes().await?;
    let detail = error_detail(&bytes).unwrap_or_else(|| status.to_string());
    tracing::warn!(status = status.as_u16(), "API error: {detail}");
    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}

pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ClientError> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Pulls a readable message out of an error body. Understands `{"detail": "..."}`,
/// validation lists `{"detail": [{"msg": "..."}]}`, and `message`/`error` keys;
/// falls back to the raw text.
pub(crate) fn error_detail(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(text) else {
        return Some(text.to_string());
    };

    for key in ["detail", "message", "mensaje", "error"] {
        match json.get(key) {
            Some(serde_json::Value::String(s)) => return Some(s.clone()),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s.clone()),
                        other => other.get("msg").and_then(|m| m.as_str()).map(str::to_string),
                    })
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
    }

    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string() {
        assert_eq!(
            error_detail(br#"{"detail": "Conciliacion no encontrada"}"#).as_deref(),
            Some("Conciliacion no encontrada")
        );
    }

    #[test]
    fn detail_validation_list() {
        let body = br#"{"detail": [{"loc": ["body", "year"], "msg": "field required"}, {"msg": "bad month"}]}"#;
        assert_eq!(error_detail(body).as_deref(), Some("field required; bad month"));
    }

    #[test]
    fn detail_message_key_and_raw_text() {
        assert_eq!(error_detail(br#"{"message": "boom"}"#).as_deref(), Some("boom"));
        assert_eq!(error_detail(b"Internal Server Error").as_deref(), Some("Internal Server Error"));
        assert_eq!(error_detail(b"  ").as_deref(), None);
    }

    #[test]
    fn empty_body_decodes_as_unit_and_none() {
        decode_body::<()>(b"").unwrap();
        assert_eq!(decode_body::<Option<i32>>(b"").unwrap(), None);
        assert!(matches!(decode_body::<Vec<i32>>(b"{"), Err(ClientError::Decode(_))));
    }
}
