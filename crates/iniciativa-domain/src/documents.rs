// documents.rs
use iniciativas_api::DocumentoRequerido;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tamaño máximo aceptado por archivo (10 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf",
                                           "application/msword",
                                           "application/vnd.openxmlformats-officedocument.wordprocessingml.document"];

pub const MSG_FILE_TOO_LARGE: &str = "El archivo no debe superar los 10MB";
pub const MSG_FILE_TYPE: &str = "Solo se permiten archivos PDF o Word";

/// Datos del archivo adjuntado (no el contenido).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
  #[serde(rename = "nombre")]
  pub filename: String,
  #[serde(rename = "tipo")]
  pub mime: String,
  #[serde(rename = "tamaño")]
  pub size: u64,
}

impl DocumentMetadata {
  pub fn new(filename: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
    Self { filename: filename.into(), mime: mime.into(), size }
  }

  /// Verifica tamaño y tipo antes de subir. Devuelve el mensaje a mostrar
  /// junto al campo cuando el archivo no es aceptable.
  pub fn check(&self) -> Result<(), String> {
    if self.size > MAX_DOCUMENT_BYTES {
      return Err(MSG_FILE_TOO_LARGE.to_string());
    }
    if !ALLOWED_MIME_TYPES.contains(&self.mime.trim()) {
      return Err(MSG_FILE_TYPE.to_string());
    }
    Ok(())
  }
}

/// Una casilla de documento del paso 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSlot {
  pub label: String,
  #[serde(default)]
  pub obligatorio: bool,
  #[serde(default)]
  pub metadata: Option<DocumentMetadata>,
  #[serde(default, rename = "cargado")]
  pub uploaded: bool,
  #[serde(default)]
  pub remote_id: Option<i64>,
}

impl DocumentSlot {
  pub fn new(label: impl Into<String>, obligatorio: bool) -> Self {
    Self { label: label.into(), obligatorio, metadata: None, uploaded: false, remote_id: None }
  }

  /// Hay archivo adjunto que todavía no se ha subido.
  pub fn is_pending(&self) -> bool {
    self.metadata.is_some() && !self.uploaded
  }
}

/// Manifiesto usado cuando el backend no entrega uno para el tipo de
/// proyecto: tres documentos, todos obligatorios.
pub fn default_document_slots() -> IndexMap<String, DocumentSlot> {
  IndexMap::from([("cartaPresentacion".to_string(), DocumentSlot::new("Carta de presentación del proyecto", true)),
                  ("anexoTecnico".to_string(), DocumentSlot::new("Anexo técnico", true)),
                  ("mgaNacional".to_string(), DocumentSlot::new("MGA Nacional", true))])
}

/// Convierte el manifiesto remoto en casillas, ordenadas por `secuencia`.
/// Un manifiesto vacío cae al manifiesto por defecto.
pub fn slots_from_manifest(manifest: &[DocumentoRequerido]) -> IndexMap<String, DocumentSlot> {
  if manifest.is_empty() {
    return default_document_slots();
  }
  let mut sorted: Vec<&DocumentoRequerido> = manifest.iter().collect();
  sorted.sort_by_key(|d| d.secuencia.unwrap_or(i64::MAX));
  sorted.into_iter()
        .map(|d| {
          let label = d.detalle.clone().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| d.nombre_archivo.clone());
          (d.nombre_archivo.clone(), DocumentSlot::new(label, d.obligatorio))
        })
        .collect()
}
