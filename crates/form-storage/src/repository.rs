// Archivo: repository.rs
// Propósito: definir el trait `KeyValueStore`, el contrato mínimo que deben
// implementar los almacenes del formulario (SQLite, en memoria, etc.).
use crate::errors::Result;

/// Almacén clave → texto. Los valores son cadenas JSON; la interpretación
/// queda a cargo de `FormStorage`.
pub trait KeyValueStore: Send + Sync {
    /// Devuelve el valor guardado bajo `key`, si existe.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Inserta o reemplaza el valor de `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Elimina `key`. Eliminar una clave inexistente no es error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Verdadero si `key` tiene valor.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
