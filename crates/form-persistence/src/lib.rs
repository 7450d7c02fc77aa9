//! Persistencia SQLite para el trait `KeyValueStore`.
//! Este archivo expone el módulo `schema` y reexporta el almacén Diesel. La
//! implementación está en `kv_persistence.rs`.

mod kv_persistence;
pub mod schema;

pub use kv_persistence::{new_from_env, DieselKeyValueStore, MIGRATIONS};
