// Archivo: client.rs
// Propósito: contrato `IniciativasApi` y su implementación HTTP sobre
// `reqwest`. Las rutas son relativas a la URL base configurada (que ya
// incluye el prefijo `mie/api`).
use crate::errors::{message_from_body, ApiError};
use crate::types::{CreateIniciativaDto, CreateRemitenteDto, DocumentUpload, DocumentoCargado, DocumentoRequerido,
                   Iniciativa, PoblacionObjetivo, Remitente, TipoProyecto, UpdateRemitenteDto};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Operaciones remotas que consume el asistente.
///
/// Las consultas (`find_*`) devuelven `Ok(None)` ante un 404: "no existe" no
/// es un error para quien consulta.
#[async_trait]
pub trait IniciativasApi: Send + Sync {
  /// `GET /remitente/{identificacion}`
  async fn find_remitente(&self, identificacion: &str) -> Result<Option<Remitente>, ApiError>;

  /// `POST /remitente/`
  async fn create_remitente(&self, dto: &CreateRemitenteDto) -> Result<Remitente, ApiError>;

  /// `POST /remitente/{id}`
  async fn update_remitente(&self, id: i64, dto: &UpdateRemitenteDto) -> Result<Remitente, ApiError>;

  /// `POST /iniciativas/{entidadId}/`
  async fn create_iniciativa(&self, entidad_id: i64, dto: &CreateIniciativaDto) -> Result<Iniciativa, ApiError>;

  /// `GET /iniciativas/{entidadId}/{radicadoOrId}/`
  async fn find_iniciativa(&self, entidad_id: i64, radicado_or_id: &str) -> Result<Option<Iniciativa>, ApiError>;

  /// `GET /iniciativas/{id}/documentos/`
  async fn list_documentos(&self, iniciativa_id: i64) -> Result<Vec<DocumentoCargado>, ApiError>;

  /// `POST /iniciativas/{id}/documentos/` (multipart)
  async fn upload_documento(&self, iniciativa_id: i64, upload: DocumentUpload) -> Result<DocumentoCargado, ApiError>;

  /// `GET /tipo-proyecto/{entidadId}`
  async fn tipos_proyecto(&self, entidad_id: i64) -> Result<Vec<TipoProyecto>, ApiError>;

  /// `GET /poblacion-objetivo/{entidadId}`
  async fn poblaciones_objetivo(&self, entidad_id: i64) -> Result<Vec<PoblacionObjetivo>, ApiError>;

  /// `GET /documentos-proyecto/{entidadId}/{tipoProyectoId}/`
  async fn documentos_requeridos(&self, entidad_id: i64, tipo_proyecto_id: i64)
                                 -> Result<Vec<DocumentoRequerido>, ApiError>;
}

/// Cliente HTTP real.
#[derive(Clone)]
pub struct HttpIniciativasApi {
  client: Client,
  base_url: String,
}

impl HttpIniciativasApi {
  /// Construye el cliente con un timeout por petición.
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
    let client = Client::builder().timeout(timeout).build()?;
    Self::with_client(client, base_url)
  }

  /// Igual que `new` pero reutilizando un `reqwest::Client` existente.
  pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self, ApiError> {
    let base_url = base_url.into();
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
      return Err(ApiError::Config("la URL base de la API está vacía".into()));
    }
    Ok(Self { client, base_url: trimmed.to_string() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Une la URL base con una ruta relativa.
  pub fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn send(&self, req: RequestBuilder) -> Result<JsonValue, ApiError> {
    let resp = req.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
      warn!("API respondió {}: {}", status, text);
      return Err(ApiError::Status { status: status.as_u16(), message: message_from_body(&text) });
    }
    if text.trim().is_empty() {
      return Ok(JsonValue::Null);
    }
    Ok(serde_json::from_str(&text)?)
  }

  async fn send_typed<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
    let body = self.send(req).await?;
    Ok(serde_json::from_value(unwrap_data(body))?)
  }

  async fn send_optional<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>, ApiError> {
    match self.send(req).await {
      Ok(JsonValue::Null) => Ok(None),
      Ok(body) => Ok(Some(serde_json::from_value(unwrap_data(body))?)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn send_list<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>, ApiError> {
    match unwrap_data(self.send(req).await?) {
      JsonValue::Null => Ok(Vec::new()),
      other => Ok(serde_json::from_value(other)?),
    }
  }
}

/// Algunas vistas del backend envuelven el registro en `{"data": ...}`.
fn unwrap_data(body: JsonValue) -> JsonValue {
  match body {
    JsonValue::Object(mut map) if map.contains_key("data") && !map.contains_key("id") => {
      map.remove("data").unwrap_or(JsonValue::Null)
    }
    other => other,
  }
}

#[async_trait]
impl IniciativasApi for HttpIniciativasApi {
  async fn find_remitente(&self, identificacion: &str) -> Result<Option<Remitente>, ApiError> {
    debug!("consultando remitente {}", identificacion);
    self.send_optional(self.client.get(self.url(&format!("remitente/{}", identificacion.trim())))).await
  }

  async fn create_remitente(&self, dto: &CreateRemitenteDto) -> Result<Remitente, ApiError> {
    debug!("creando remitente tipo {}", dto.tipo);
    self.send_typed(self.client.post(self.url("remitente/")).json(dto)).await
  }

  async fn update_remitente(&self, id: i64, dto: &UpdateRemitenteDto) -> Result<Remitente, ApiError> {
    debug!("actualizando remitente {}", id);
    self.send_typed(self.client.post(self.url(&format!("remitente/{}", id))).json(dto)).await
  }

  async fn create_iniciativa(&self, entidad_id: i64, dto: &CreateIniciativaDto) -> Result<Iniciativa, ApiError> {
    debug!("creando iniciativa para remitente {}", dto.radicado_por);
    self.send_typed(self.client.post(self.url(&format!("iniciativas/{}/", entidad_id))).json(dto)).await
  }

  async fn find_iniciativa(&self, entidad_id: i64, radicado_or_id: &str) -> Result<Option<Iniciativa>, ApiError> {
    let path = format!("iniciativas/{}/{}/", entidad_id, radicado_or_id.trim());
    self.send_optional(self.client.get(self.url(&path))).await
  }

  async fn list_documentos(&self, iniciativa_id: i64) -> Result<Vec<DocumentoCargado>, ApiError> {
    self.send_list(self.client.get(self.url(&format!("iniciativas/{}/documentos/", iniciativa_id)))).await
  }

  async fn upload_documento(&self, iniciativa_id: i64, upload: DocumentUpload) -> Result<DocumentoCargado, ApiError> {
    debug!("subiendo {} ({} bytes) a iniciativa {}",
           upload.nombre_archivo,
           upload.contenido.len(),
           iniciativa_id);
    let part = reqwest::multipart::Part::bytes(upload.contenido).file_name(upload.nombre_archivo)
                                                                .mime_str(&upload.mime)?;
    let form = reqwest::multipart::Form::new().text("tipo_documento", upload.tipo_documento)
                                              .part("archivo", part);
    let url = self.url(&format!("iniciativas/{}/documentos/", iniciativa_id));
    self.send_typed(self.client.post(url).multipart(form)).await
  }

  async fn tipos_proyecto(&self, entidad_id: i64) -> Result<Vec<TipoProyecto>, ApiError> {
    self.send_list(self.client.get(self.url(&format!("tipo-proyecto/{}", entidad_id)))).await
  }

  async fn poblaciones_objetivo(&self, entidad_id: i64) -> Result<Vec<PoblacionObjetivo>, ApiError> {
    self.send_list(self.client.get(self.url(&format!("poblacion-objetivo/{}", entidad_id)))).await
  }

  async fn documentos_requeridos(&self, entidad_id: i64, tipo_proyecto_id: i64)
                                 -> Result<Vec<DocumentoRequerido>, ApiError> {
    let path = format!("documentos-proyecto/{}/{}/", entidad_id, tipo_proyecto_id);
    self.send_list(self.client.get(self.url(&path))).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn unwrap_data_only_strips_envelopes() {
    assert_eq!(unwrap_data(json!({"data": [1, 2]})), json!([1, 2]));
    assert_eq!(unwrap_data(json!({"id": 3, "data": "x"})), json!({"id": 3, "data": "x"}));
    assert_eq!(unwrap_data(json!([1])), json!([1]));
  }

  #[test]
  fn url_joins_without_double_slashes() {
    let api = HttpIniciativasApi::new("http://localhost:8000/mie/api/", Duration::from_secs(5)).unwrap();
    assert_eq!(api.url("/remitente/"), "http://localhost:8000/mie/api/remitente/");
    assert_eq!(api.url("tipo-proyecto/1"), "http://localhost:8000/mie/api/tipo-proyecto/1");
  }

  #[test]
  fn empty_base_url_is_a_config_error() {
    let err = HttpIniciativasApi::new("  ", Duration::from_secs(5)).err().unwrap();
    assert!(matches!(err, ApiError::Config(_)));
  }
}
