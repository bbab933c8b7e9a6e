use conciliador_core::{CuentaId, Money, MovimientoExtracto};
use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::error::ClientError;

/// A file ready to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub nombre: String,
    pub contenido: Vec<u8>,
    pub mime: String,
}

impl FileUpload {
    pub fn new(nombre: impl Into<String>, contenido: Vec<u8>) -> Self {
        let nombre = nombre.into();
        let mime = mime_for(&nombre).to_string();
        Self { nombre, contenido, mime }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let contenido = tokio::fs::read(path).await?;
        let nombre = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("archivo")
            .to_string();
        Ok(Self::new(nombre, contenido))
    }

    pub(crate) fn into_part(self) -> Result<Part, ClientError> {
        Ok(Part::bytes(self.contenido)
            .file_name(self.nombre)
            .mime_str(&self.mime)?)
    }
}

fn mime_for(nombre: &str) -> &'static str {
    let ext = nombre.rsplit_once('.').map(|(_, e)| e.to_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Statement upload for `analizar-extracto` / `cargar-extracto`.
///
/// Numeric overrides replace what the backend would read from the file.
/// `movimientos_confirmados` carries rows the operator already reviewed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractoUpload {
    pub archivo: FileUpload,
    pub cuenta_id: CuentaId,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub saldo_anterior: Option<Money>,
    pub entradas: Option<Money>,
    pub salidas: Option<Money>,
    pub saldo_final: Option<Money>,
    pub movimientos_confirmados: Option<Vec<MovimientoExtracto>>,
}

impl ExtractoUpload {
    pub fn new(archivo: FileUpload, cuenta_id: CuentaId) -> Self {
        Self {
            archivo,
            cuenta_id,
            year: None,
            month: None,
            saldo_anterior: None,
            entradas: None,
            salidas: None,
            saldo_final: None,
            movimientos_confirmados: None,
        }
    }

    /// Text fields of the form, in send order. Undefined optionals are not appended.
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        let mut fields = vec![("cuenta_id", self.cuenta_id.to_string())];
        if let Some(year) = self.year {
            fields.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            fields.push(("month", month.to_string()));
        }
        let amounts = [
            ("saldo_anterior", self.saldo_anterior),
            ("entradas", self.entradas),
            ("salidas", self.salidas),
            ("saldo_final", self.saldo_final),
        ];
        for (name, value) in amounts {
            if let Some(v) = value {
                fields.push((name, v.as_decimal().normalize().to_string()));
            }
        }
        if let Some(rows) = &self.movimientos_confirmados {
            let encoded = serde_json::to_string(rows).map_err(|e| ClientError::Encode(e.to_string()))?;
            fields.push(("movimientos_confirmados", encoded));
        }
        Ok(fields)
    }

    pub(crate) fn into_form(self) -> Result<Form, ClientError> {
        let fields = self.text_fields()?;
        let mut form = Form::new().part("file", self.archivo.into_part()?);
        for (name, value) in fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}
