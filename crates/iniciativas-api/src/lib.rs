//! Crate `iniciativas-api`: cliente del backend REST de iniciativas
//!
//! Expone el contrato `IniciativasApi` (remitentes, iniciativas, documentos y
//! catálogos), una implementación HTTP (`HttpIniciativasApi`) y un backend en
//! memoria (`InMemoryIniciativasApi`) para pruebas y modo sin conexión.
//!
//! Ejemplo rápido:
//! ```rust
//! use iniciativas_api::{HttpIniciativasApi, IniciativasApi};
//! use std::time::Duration;
//! let api = HttpIniciativasApi::new("http://localhost:8000/mie/api", Duration::from_secs(10)).unwrap();
//! assert_eq!(api.base_url(), "http://localhost:8000/mie/api");
//! ```
pub mod client;
pub mod errors;
pub mod stubs;
pub mod types;

pub use client::{HttpIniciativasApi, IniciativasApi};
pub use errors::{message_from_body, ApiError, GENERIC_ERROR_MESSAGE};
pub use stubs::{ApiOperation, InMemoryIniciativasApi, FIRST_STUB_RADICADO};
pub use types::*;
