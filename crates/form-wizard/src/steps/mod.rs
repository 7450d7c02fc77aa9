//! Pasos del asistente y su efecto remoto.
//!
//! Cada paso recibe una copia del estado y devuelve el estado resultante;
//! el controlador sólo lo adopta si el efecto terminó bien, de modo que un
//! fallo remoto no deja cambios a medias.

mod documents;
mod identity;
mod initiative;

pub use documents::DocumentsStep;
pub use identity::IdentityStep;
pub use initiative::InitiativeStep;
pub(crate) use documents::upload_one;

use crate::config::WizardConfig;
use crate::errors::WizardError;
use crate::session::PendingAttachment;
use async_trait::async_trait;
use iniciativa_domain::{validate_step, FormState};
use iniciativas_api::IniciativasApi;
use std::collections::HashMap;

/// Contexto compartido por los pasos durante un `commit`.
pub struct StepContext<'a> {
  pub api: &'a dyn IniciativasApi,
  pub config: &'a WizardConfig,
  pub attachments: &'a HashMap<String, PendingAttachment>,
}

#[async_trait]
pub trait WizardStep: Send + Sync {
  /// Número del paso (1-based).
  fn number(&self) -> u8;

  fn name(&self) -> &str;

  /// El paso puede confirmarse. Por defecto: todas sus reglas pasan.
  fn is_ready(&self, state: &FormState, _attachments: &HashMap<String, PendingAttachment>) -> bool {
    validate_step(state).is_valid()
  }

  async fn commit(&self, ctx: &StepContext<'_>, state: FormState) -> Result<FormState, WizardError>;
}
