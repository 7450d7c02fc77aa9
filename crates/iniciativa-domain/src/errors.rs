// error.rs
use iniciativas_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  ValidationError(String),
  #[error("Campo desconocido '{field}' para {kind}")]
  UnknownField { kind: String, field: String },
  #[error("El radicado {current} ya fue asignado; no puede reemplazarse por {attempted}")]
  RadicadoConflict { current: i64, attempted: i64 },
  #[error("Error externo: {0}")]
  ExternalError(String),
  #[error("Error de serialización: {0}")]
  SerializationError(String),
}

impl From<ApiError> for DomainError {
  fn from(e: ApiError) -> Self {
    Self::ExternalError(e.user_message())
  }
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::SerializationError(e.to_string())
  }
}
