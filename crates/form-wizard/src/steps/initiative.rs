use super::{StepContext, WizardStep};
use crate::errors::WizardError;
use async_trait::async_trait;
use iniciativa_domain::normalize::iniciativa_payload;
use iniciativa_domain::{default_document_slots, slots_from_manifest, DocumentSlot, FormState, SubmitterKind};
use iniciativas_api::ApiError;
use indexmap::IndexMap;
use log::{info, warn};

/// Paso 2: datos de la iniciativa. Crea la iniciativa una sola vez y guarda
/// id y radicado; para personas naturales carga además el manifiesto de
/// documentos del tipo de proyecto.
pub struct InitiativeStep;

#[async_trait]
impl WizardStep for InitiativeStep {
  fn number(&self) -> u8 {
    2
  }

  fn name(&self) -> &str {
    "iniciativa"
  }

  async fn commit(&self, ctx: &StepContext<'_>, mut state: FormState) -> Result<FormState, WizardError> {
    let entidad = ctx.config.entidad_id;
    if state.active_branch().refs().iniciativa_id.is_none() {
      let dto = iniciativa_payload(&state, entidad)?;
      let created = ctx.api.create_iniciativa(entidad, &dto).await?;
      let radicado = match created.radicado {
        Some(r) => r,
        None => ctx.api
                   .find_iniciativa(entidad, &created.id.to_string())
                   .await?
                   .and_then(|i| i.radicado)
                   .ok_or_else(|| ApiError::UnexpectedResponse("la iniciativa creada no tiene radicado".into()))?,
      };
      let refs = state.active_branch_mut().refs_mut();
      refs.iniciativa_id = Some(created.id);
      refs.assign_radicado(radicado)?;
      info!("iniciativa {} radicada con {}", created.id, radicado);
    }
    if state.submitter_kind == SubmitterKind::Person {
      let slots = required_documents(ctx, &state).await;
      state.persona.replace_document_slots(slots);
    }
    Ok(state)
  }
}

async fn required_documents(ctx: &StepContext<'_>, state: &FormState) -> IndexMap<String, DocumentSlot> {
  let tipo = state.persona.initiative.tipo_proyecto.trim();
  let tipo_id: i64 = match tipo.parse() {
    Ok(id) => id,
    Err(_) => return default_document_slots(),
  };
  match ctx.api.documentos_requeridos(ctx.config.entidad_id, tipo_id).await {
    Ok(manifest) => slots_from_manifest(&manifest),
    Err(e) => {
      warn!("No se pudo cargar el manifiesto del tipo {}: {}", tipo_id, e);
      default_document_slots()
    }
  }
}
