use super::{StepContext, WizardStep};
use crate::errors::WizardError;
use async_trait::async_trait;
use iniciativa_domain::normalize::{identificacion, remitente_payload, remitente_update_payload};
use iniciativa_domain::FormState;
use log::info;

/// Paso 1: datos del remitente.
///
/// Con id de remitente en sesión sólo actualiza email y teléfono. Sin id,
/// busca por identificación y reutiliza el registro encontrado, al que
/// también se le actualizan email y teléfono; crea uno nuevo únicamente si
/// no existe.
pub struct IdentityStep;

#[async_trait]
impl WizardStep for IdentityStep {
  fn number(&self) -> u8 {
    1
  }

  fn name(&self) -> &str {
    "remitente"
  }

  async fn commit(&self, ctx: &StepContext<'_>, mut state: FormState) -> Result<FormState, WizardError> {
    if let Some(id) = state.active_branch().refs().remitente_id {
      ctx.api.update_remitente(id, &remitente_update_payload(&state)).await?;
      info!("remitente {} actualizado", id);
      return Ok(state);
    }
    let ident = identificacion(&state)?;
    let id = match ctx.api.find_remitente(&ident.to_string()).await? {
      Some(found) => {
        ctx.api.update_remitente(found.id, &remitente_update_payload(&state)).await?;
        info!("remitente existente {} reutilizado y actualizado", found.id);
        found.id
      }
      None => {
        let created = ctx.api.create_remitente(&remitente_payload(&state, &ctx.config.origen)?).await?;
        info!("remitente {} creado", created.id);
        created.id
      }
    };
    state.active_branch_mut().refs_mut().remitente_id = Some(id);
    Ok(state)
  }
}
