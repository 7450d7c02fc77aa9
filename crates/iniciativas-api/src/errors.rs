// Archivo: errors.rs
// Propósito: errores del cliente REST y extracción del mensaje legible que
// se muestra al usuario cuando una llamada remota falla.
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Mensaje por defecto cuando la respuesta no trae detalle utilizable.
pub const GENERIC_ERROR_MESSAGE: &str =
  "Ocurrió un error al procesar la solicitud. Por favor intente de nuevo más tarde.";

/// Errores del cliente de la API de iniciativas.
#[derive(Error, Debug)]
pub enum ApiError {
  /// Fallo de transporte (conexión, timeout, TLS).
  #[error("Error HTTP: {0}")]
  Http(#[from] reqwest::Error),

  /// El servidor respondió con un estado no exitoso.
  #[error("Respuesta {status} del servidor: {}", .message.as_deref().unwrap_or("sin detalle"))]
  Status { status: u16, message: Option<String> },

  /// El cuerpo no pudo (de)serializarse.
  #[error("Error de serializacion: {0}")]
  Serialization(#[from] serde_json::Error),

  /// El cuerpo es JSON válido pero le falta algo que necesitamos (ej. `id`).
  #[error("Respuesta inesperada: {0}")]
  UnexpectedResponse(String),

  #[error("Error de configuracion: {0}")]
  Config(String),
}

impl ApiError {
  /// Verdadero para un 404; las consultas lo tratan como "sin registro".
  pub fn is_not_found(&self) -> bool {
    matches!(self, ApiError::Status { status: 404, .. })
  }

  /// Mensaje único para el banner de error. Usa el detalle enviado por el
  /// servidor cuando existe; en otro caso el mensaje genérico.
  pub fn user_message(&self) -> String {
    match self {
      ApiError::Status { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
      _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
  }
}

/// Busca un mensaje legible en el cuerpo de una respuesta de error. Se
/// revisan, en orden, los campos `error`, `message` y `detail`.
pub fn message_from_body(body: &str) -> Option<String> {
  let value: JsonValue = serde_json::from_str(body).ok()?;
  ["error", "message", "detail"].iter()
                                .filter_map(|k| value.get(*k))
                                .filter_map(|v| v.as_str())
                                .map(str::trim)
                                .find(|s| !s.is_empty())
                                .map(String::from)
}
