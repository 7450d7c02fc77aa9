use form_storage::StorageError;
use iniciativa_domain::DomainError;
use iniciativas_api::{ApiError, GENERIC_ERROR_MESSAGE};
use thiserror::Error;

pub const MSG_BUSY: &str = "Hay una operación en curso. Por favor espere.";

// Errores comunes del asistente.
//
// Centraliza los errores que pueden ocurrir al navegar el formulario:
// fallos remotos (`ApiError`), reglas del dominio (`DomainError`),
// almacenamiento y validaciones locales.
#[derive(Error, Debug)]
pub enum WizardError {
  /// Errores originados por el backend remoto.
  #[error("Error de API: {0}")]
  Api(#[from] ApiError),

  /// Errores originados por reglas del dominio.
  #[error("Error de dominio: {0}")]
  Domain(#[from] DomainError),

  /// Errores del almacenamiento local del formulario.
  #[error("Error de almacenamiento: {0}")]
  Storage(#[from] StorageError),

  /// Validación local fallida (nunca llega a la red).
  #[error("Error de validacion: {0}")]
  Validation(String),

  /// La consulta no encontró registro.
  #[error("No encontrado: {0}")]
  NotFound(String),

  /// Ya hay un envío en curso.
  #[error("Operación en curso")]
  Busy,

  /// Navegación no permitida desde el estado actual.
  #[error("Transición inválida: {0}")]
  InvalidTransition(String),

  #[error("Error de configuracion: {0}")]
  Config(String),

  /// Error generico; el texto ya es apto para el usuario.
  #[error("Otro error: {0}")]
  Other(String),
}

impl WizardError {
  /// Mensaje único para el banner de error.
  pub fn user_message(&self) -> String {
    match self {
      WizardError::Api(e) => e.user_message(),
      WizardError::Domain(DomainError::ValidationError(m)) | WizardError::Domain(DomainError::ExternalError(m)) => {
        m.clone()
      }
      WizardError::Domain(e) => e.to_string(),
      WizardError::Validation(m)
      | WizardError::NotFound(m)
      | WizardError::InvalidTransition(m)
      | WizardError::Other(m) => m.clone(),
      WizardError::Busy => MSG_BUSY.to_string(),
      WizardError::Storage(_) | WizardError::Config(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
  }
}
