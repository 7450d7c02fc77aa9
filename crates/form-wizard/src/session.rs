//! Sesión del asistente: estado del formulario, mapa de validación,
//! mensajes de estado y adjuntos pendientes. Cada cambio se espeja en el
//! almacenamiento.

use crate::errors::WizardError;
use form_storage::{FormStorage, SubmissionReceipt};
use iniciativa_domain::{validate_step, DocumentMetadata, FormPatch, FormState, SubmitterKind, ValidationState};
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

/// Archivo elegido por el usuario. El contenido vive sólo en memoria; lo
/// persistido son los metadatos de la casilla.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAttachment {
  pub metadata: DocumentMetadata,
  pub contenido: Vec<u8>,
}

/// Mensajes visibles de la sesión.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStatus {
  pub loading: bool,
  pub error: Option<String>,
  pub success: Option<String>,
}

pub struct FormSession {
  id: Uuid,
  state: FormState,
  validation: ValidationState,
  error: Option<String>,
  success: Option<String>,
  attachments: HashMap<String, PendingAttachment>,
  receipt: Option<SubmissionReceipt>,
  storage: FormStorage,
}

impl FormSession {
  /// Abre la sesión restaurando lo que haya en el almacenamiento.
  pub fn open(storage: FormStorage) -> Self {
    let state = storage.load().unwrap_or_default();
    Self::with_state(storage, state)
  }

  pub fn with_state(storage: FormStorage, state: FormState) -> Self {
    let id = Uuid::new_v4();
    debug!("sesión {} abierta (tipo {}, paso {})", id, state.submitter_kind, state.step);
    Self { id,
           state,
           validation: ValidationState::new(),
           error: None,
           success: None,
           attachments: HashMap::new(),
           receipt: None,
           storage }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn state(&self) -> &FormState {
    &self.state
  }

  pub fn validation(&self) -> &ValidationState {
    &self.validation
  }

  pub fn storage(&self) -> &FormStorage {
    &self.storage
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn success(&self) -> Option<&str> {
    self.success.as_deref()
  }

  /// Comprobante del envío, una vez radicada la iniciativa.
  pub fn receipt(&self) -> Option<&SubmissionReceipt> {
    self.receipt.as_ref()
  }

  pub fn is_submitted(&self) -> bool {
    self.receipt.is_some()
  }

  pub fn attachments(&self) -> &HashMap<String, PendingAttachment> {
    &self.attachments
  }

  /// Fusiona la actualización parcial y guarda. No valida.
  pub fn update_form_data(&mut self, patch: &FormPatch) -> Result<(), WizardError> {
    if patch.is_empty() {
      return Ok(());
    }
    let previous_kind = self.state.submitter_kind;
    self.state.apply(patch)?;
    if self.state.submitter_kind != previous_kind {
      self.validation = ValidationState::new();
      self.attachments.clear();
    }
    self.storage.save(&self.state);
    Ok(())
  }

  /// Vuelve al estado inicial y borra la copia guardada.
  pub fn reset_form(&mut self) {
    self.storage.clear();
    self.replace_fresh(FormState::default());
  }

  /// Vuelve al paso 1 conservando tipo e id de remitente.
  pub fn reset_preserving_submitter(&mut self) {
    let fresh = match self.storage.clear_preserving_submitter() {
      Some(s) => s,
      None => {
        // almacenamiento sin claves de recuperación: se toma de memoria
        let mut s = FormState::new(self.state.submitter_kind);
        s.active_branch_mut().refs_mut().remitente_id = self.state.active_branch().refs().remitente_id;
        self.storage.save(&s);
        s
      }
    };
    self.replace_fresh(fresh);
  }

  fn replace_fresh(&mut self, state: FormState) {
    self.state = state;
    self.validation = ValidationState::new();
    self.attachments.clear();
    self.receipt = None;
    self.clear_messages();
  }

  /// Revalida el paso actual. El mapa sólo se reescribe si cambió.
  pub fn validate_current_step(&mut self) -> bool {
    let fresh = validate_step(&self.state);
    let valid = fresh.is_valid();
    if fresh != self.validation {
      self.validation = fresh;
    }
    valid
  }

  pub fn clear_messages(&mut self) {
    self.error = None;
    self.success = None;
  }

  pub(crate) fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
    self.success = None;
  }

  pub(crate) fn set_success(&mut self, message: impl Into<String>) {
    self.success = Some(message.into());
    self.error = None;
  }

  /// Reemplaza el estado tras un efecto remoto exitoso y guarda.
  pub(crate) fn commit_state(&mut self, state: FormState) {
    self.state = state;
    self.storage.save(&self.state);
  }

  pub(crate) fn set_step(&mut self, step: u8) {
    self.state.step = step;
    self.state.clamp_step();
    self.storage.save(&self.state);
  }

  /// Registra el archivo elegido para una casilla (pendiente de subir).
  pub(crate) fn attach(&mut self, key: &str, attachment: PendingAttachment) -> Result<(), WizardError> {
    if self.state.submitter_kind != SubmitterKind::Person {
      return Err(WizardError::InvalidTransition("Solo las personas naturales adjuntan documentos".into()));
    }
    self.state.persona.attach_document(key, attachment.metadata.clone())?;
    self.attachments.insert(key.to_string(), attachment);
    self.storage.save(&self.state);
    Ok(())
  }

  pub(crate) fn detach(&mut self, key: &str) -> Result<(), WizardError> {
    self.state.persona.remove_document(key)?;
    self.attachments.remove(key);
    self.storage.save(&self.state);
    Ok(())
  }

  /// Descarta los contenidos ya subidos.
  pub(crate) fn drop_uploaded_attachments(&mut self) {
    let docs = &self.state.persona.documentos;
    self.attachments.retain(|key, _| docs.get(key).map(|s| !s.uploaded).unwrap_or(false));
  }

  pub(crate) fn mark_submitted(&mut self, receipt: SubmissionReceipt) {
    self.storage.save_success(&receipt);
    self.receipt = Some(receipt);
  }

  pub fn status(&self, loading: bool) -> SessionStatus {
    SessionStatus { loading, error: self.error.clone(), success: self.success.clone() }
  }
}
