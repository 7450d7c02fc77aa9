// Archivo: service.rs
// Propósito: `FormStorage`, el adaptador que espeja el estado del formulario
// en un `KeyValueStore`: registro completo, claves de recuperación, último
// envío exitoso e historial.
//
// Las escrituras son best-effort: un fallo del almacén se registra con
// `log::warn!` y nunca se propaga al asistente.
use crate::errors::Result;
use crate::repository::KeyValueStore;
use chrono::{DateTime, Utc};
use iniciativa_domain::{FormState, SubmitterKind};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claves usadas en el almacén. Los valores son JSON.
pub mod keys {
    pub const FORM_DATA: &str = "formData";
    pub const TIPO_REMITENTE: &str = "tipoRemitente";
    pub const PASO_ACTUAL: &str = "pasoActual";
    pub const REMITENTE_ID: &str = "remitenteId";
    pub const INICIATIVA_ID: &str = "iniciativaId";
    pub const RADICADO: &str = "radicado";
    pub const ULTIMO_ENVIO: &str = "ultimoEnvio";
    pub const HISTORIAL_ENVIOS: &str = "historialEnvios";

    /// Claves que borra `clear`. El último envío y el historial se conservan.
    pub const FORM_KEYS: [&str; 6] = [FORM_DATA, TIPO_REMITENTE, PASO_ACTUAL, REMITENTE_ID, INICIATIVA_ID, RADICADO];
}

/// Entradas máximas del historial de envíos.
pub const HISTORY_LIMIT: usize = 10;

/// Comprobante de un envío confirmado por el backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub tipo_remitente: SubmitterKind,
    pub remitente_id: Option<i64>,
    pub iniciativa_id: Option<i64>,
    pub radicado: i64,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionReceipt {
    /// Construye el comprobante a partir de la rama activa. `None` si aún no
    /// hay radicado.
    pub fn from_state(state: &FormState) -> Option<Self> {
        let refs = state.active_branch().refs();
        Some(Self { tipo_remitente: state.submitter_kind,
                    remitente_id: refs.remitente_id,
                    iniciativa_id: refs.iniciativa_id,
                    radicado: refs.radicado?,
                    timestamp: Utc::now() })
    }
}

/// Adaptador de persistencia del formulario.
#[derive(Clone)]
pub struct FormStorage {
    store: Arc<dyn KeyValueStore>,
}

impl FormStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Guarda el estado completo y las claves de recuperación. Los errores se
    /// registran y se descartan.
    pub fn save(&self, state: &FormState) {
        if let Err(e) = self.try_save(state) {
            warn!("No se pudo guardar el formulario: {}", e);
        }
    }

    /// Variante que propaga el error; `save` la envuelve.
    pub fn try_save(&self, state: &FormState) -> Result<()> {
        self.put(keys::FORM_DATA, state)?;
        self.put(keys::TIPO_REMITENTE, &state.submitter_kind)?;
        self.put(keys::PASO_ACTUAL, &state.step)?;
        let refs = state.active_branch().refs();
        self.mirror(keys::REMITENTE_ID, refs.remitente_id)?;
        self.mirror(keys::INICIATIVA_ID, refs.iniciativa_id)?;
        self.mirror(keys::RADICADO, refs.radicado)?;
        debug!("formulario guardado (tipo {}, paso {})", state.submitter_kind, state.step);
        Ok(())
    }

    /// Recupera el formulario. Usa el registro completo si es legible; si no,
    /// lo reconstruye a partir de las claves de recuperación. `None` sólo
    /// cuando no hay ni siquiera tipo de remitente.
    pub fn load(&self) -> Option<FormState> {
        match self.get::<FormState>(keys::FORM_DATA) {
            Ok(Some(mut state)) => {
                state.clamp_step();
                return Some(state);
            }
            Ok(None) => {}
            Err(e) => warn!("Registro completo del formulario ilegible, se intenta recuperar: {}", e),
        }
        self.recover()
    }

    fn recover(&self) -> Option<FormState> {
        let kind = self.get_lenient::<SubmitterKind>(keys::TIPO_REMITENTE)?;
        let mut state = FormState::new(kind);
        state.step = self.get_lenient::<u8>(keys::PASO_ACTUAL).unwrap_or(1);
        state.clamp_step();
        let refs = state.active_branch_mut().refs_mut();
        refs.remitente_id = self.get_lenient(keys::REMITENTE_ID);
        refs.iniciativa_id = self.get_lenient(keys::INICIATIVA_ID);
        refs.radicado = self.get_lenient(keys::RADICADO);
        debug!("formulario reconstruido desde claves de recuperación (tipo {})", kind);
        Some(state)
    }

    /// Borra el formulario guardado. El último envío y el historial se
    /// conservan.
    pub fn clear(&self) {
        for key in keys::FORM_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!("No se pudo borrar la clave {}: {}", key, e);
            }
        }
    }

    /// Borra el formulario pero conserva tipo de remitente e id de remitente
    /// para radicar otra iniciativa con el mismo remitente. Devuelve el
    /// estado inicial resultante (paso 1), que también queda guardado.
    pub fn clear_preserving_submitter(&self) -> Option<FormState> {
        let kind = self.get_lenient::<SubmitterKind>(keys::TIPO_REMITENTE);
        let remitente_id = self.get_lenient::<i64>(keys::REMITENTE_ID);
        self.clear();
        let (kind, remitente_id) = (kind?, remitente_id?);
        let mut state = FormState::new(kind);
        state.active_branch_mut().refs_mut().remitente_id = Some(remitente_id);
        self.save(&state);
        Some(state)
    }

    /// Verdadero si hay algo recuperable.
    pub fn has_stored_form(&self) -> bool {
        [keys::FORM_DATA, keys::TIPO_REMITENTE].iter()
                                               .any(|k| self.store.contains(k).unwrap_or(false))
    }

    /// Registra un envío exitoso: último envío más historial acotado a
    /// `HISTORY_LIMIT` entradas (las más recientes).
    pub fn save_success(&self, receipt: &SubmissionReceipt) {
        let mut history = self.history();
        history.push(receipt.clone());
        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }
        let result = self.put(keys::ULTIMO_ENVIO, receipt).and_then(|_| self.put(keys::HISTORIAL_ENVIOS, &history));
        if let Err(e) = result {
            warn!("No se pudo registrar el envío {}: {}", receipt.radicado, e);
        }
    }

    pub fn last_success(&self) -> Option<SubmissionReceipt> {
        self.get_lenient(keys::ULTIMO_ENVIO)
    }

    /// Historial, del más antiguo al más reciente.
    pub fn history(&self) -> Vec<SubmissionReceipt> {
        self.get_lenient(keys::HISTORIAL_ENVIOS).unwrap_or_default()
    }

    fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    fn mirror(&self, key: &str, value: Option<i64>) -> Result<()> {
        match value {
            Some(v) => self.put(key, &v),
            None => self.store.remove(key),
        }
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    // Lectura tolerante: un valor ilegible cuenta como ausente.
    fn get_lenient<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!("Clave {} ilegible: {}", key, e);
                None
            }
        }
    }
}
