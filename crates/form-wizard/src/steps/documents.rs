use super::{StepContext, WizardStep};
use crate::errors::WizardError;
use crate::session::PendingAttachment;
use async_trait::async_trait;
use iniciativa_domain::{FormState, PersonaData};
use iniciativas_api::{DocumentUpload, IniciativasApi};
use log::info;
use std::collections::HashMap;

pub const MSG_MISSING_INICIATIVA: &str = "No se encontró la iniciativa. Por favor complete el paso 2.";

/// Paso 3 (sólo personas naturales): documentos del proyecto.
pub struct DocumentsStep;

#[async_trait]
impl WizardStep for DocumentsStep {
  fn number(&self) -> u8 {
    3
  }

  fn name(&self) -> &str {
    "documentos"
  }

  /// Cada documento obligatorio está subido o tiene un archivo pendiente
  /// listo para subir.
  fn is_ready(&self, state: &FormState, attachments: &HashMap<String, PendingAttachment>) -> bool {
    state.persona
         .documentos
         .iter()
         .filter(|(_, slot)| slot.obligatorio)
         .all(|(key, slot)| slot.uploaded || (slot.is_pending() && attachments.contains_key(key)))
  }

  async fn commit(&self, ctx: &StepContext<'_>, mut state: FormState) -> Result<FormState, WizardError> {
    let pending: Vec<String> = state.persona
                                    .documentos
                                    .iter()
                                    .filter(|(key, slot)| slot.is_pending() && ctx.attachments.contains_key(*key))
                                    .map(|(key, _)| key.clone())
                                    .collect();
    for key in pending {
      if let Some(attachment) = ctx.attachments.get(&key) {
        upload_one(ctx.api, &mut state.persona, &key, attachment).await?;
      }
    }
    Ok(state)
  }
}

/// Sube un archivo y marca la casilla como cargada.
pub(crate) async fn upload_one(api: &dyn IniciativasApi, persona: &mut PersonaData, key: &str,
                               attachment: &PendingAttachment)
                               -> Result<(), WizardError> {
  let iniciativa_id =
    persona.refs.iniciativa_id.ok_or_else(|| WizardError::Validation(MSG_MISSING_INICIATIVA.to_string()))?;
  let upload = DocumentUpload { tipo_documento: key.to_string(),
                                nombre_archivo: attachment.metadata.filename.clone(),
                                mime: attachment.metadata.mime.clone(),
                                contenido: attachment.contenido.clone() };
  let doc = api.upload_documento(iniciativa_id, upload).await?;
  persona.mark_uploaded(key, doc.id)?;
  info!("documento {} cargado en la iniciativa {}", key, iniciativa_id);
  Ok(())
}
