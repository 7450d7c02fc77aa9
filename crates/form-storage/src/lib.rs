//! Crate `form-storage`: persistencia del formulario de iniciativas
//!
//! Define el contrato `KeyValueStore`, una implementación en memoria
//! (`InMemoryKeyValueStore`) y el adaptador `FormStorage`, que espeja el
//! estado del asistente en el almacén.
//!
//! Diseño resumido:
//! - Registro completo bajo `formData` más claves de recuperación (tipo de
//!   remitente, paso, ids y radicado) para reconstruir lo esencial si el
//!   registro completo se pierde o se corrompe.
//! - Escrituras best-effort: los errores se registran, no se propagan.
//! - Último envío e historial (máximo 10) sobreviven a `clear`.
//!
//! Ejemplo rápido:
//! ```rust
//! use form_storage::{FormStorage, InMemoryKeyValueStore};
//! use iniciativa_domain::FormState;
//! use std::sync::Arc;
//! let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
//! storage.save(&FormState::default());
//! assert!(storage.has_stored_form());
//! ```
pub mod errors;
pub mod repository;
pub mod service;
pub mod stubs;

pub use errors::*;
pub use repository::*;
pub use service::*;
pub use stubs::*;
