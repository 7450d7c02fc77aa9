// Archivo: errors.rs
// Propósito: errores del almacenamiento clave-valor y alias Result<T> usado
// por las APIs del crate.
use thiserror::Error;

/// Errores del almacenamiento del formulario.
///
/// - `Unavailable`: el almacén no acepta escrituras (lleno, sólo lectura).
/// - `Storage`: error al acceder al almacenamiento externo.
/// - `Serialization`: un valor no pudo codificarse o decodificarse.
#[derive(Error, Debug)]
pub enum StorageError {
    /// El almacén rechazó la operación.
    #[error("Almacenamiento no disponible: {0}")]
    Unavailable(String),
    /// Error genérico de almacenamiento (BD, archivo, etc.).
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
    /// JSON inválido al leer o escribir una clave.
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, StorageError>;
