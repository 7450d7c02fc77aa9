// form.rs
use crate::branches::{EntidadData, OrganizacionData, PersonaData, SubmitterData};
use crate::{DomainError, SubmitterKind};
use iniciativas_api::Ubicacion;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn first_step() -> u8 {
  1
}

/// Estado completo del formulario. Es lo que se persiste bajo `formData`.
///
/// Sólo la rama que coincide con `submitter_kind` es autoritativa; las otras
/// se conservan tal cual pero no se validan ni se envían.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
  #[serde(rename = "paso", default = "first_step")]
  pub step: u8,
  #[serde(rename = "tipoRemitente", default)]
  pub submitter_kind: SubmitterKind,
  #[serde(rename = "datosPersona", default)]
  pub persona: PersonaData,
  #[serde(rename = "datosEntidad", default)]
  pub entidad: EntidadData,
  #[serde(rename = "datosOrganizacion", default)]
  pub organizacion: OrganizacionData,
}

impl Default for FormState {
  fn default() -> Self {
    Self { step: 1,
           submitter_kind: SubmitterKind::default(),
           persona: PersonaData::default(),
           entidad: EntidadData::default(),
           organizacion: OrganizacionData::default() }
  }
}

impl FormState {
  pub fn new(kind: SubmitterKind) -> Self {
    Self { submitter_kind: kind, ..Self::default() }
  }

  pub fn max_steps(&self) -> u8 {
    self.submitter_kind.max_steps()
  }

  pub fn is_last_step(&self) -> bool {
    self.step >= self.max_steps()
  }

  pub fn active_branch(&self) -> &dyn SubmitterData {
    self.branch(self.submitter_kind)
  }

  pub fn active_branch_mut(&mut self) -> &mut dyn SubmitterData {
    self.branch_mut(self.submitter_kind)
  }

  pub fn branch(&self, kind: SubmitterKind) -> &dyn SubmitterData {
    match kind {
      SubmitterKind::Person => &self.persona,
      SubmitterKind::Entity => &self.entidad,
      SubmitterKind::Organization => &self.organizacion,
    }
  }

  pub fn branch_mut(&mut self, kind: SubmitterKind) -> &mut dyn SubmitterData {
    match kind {
      SubmitterKind::Person => &mut self.persona,
      SubmitterKind::Entity => &mut self.entidad,
      SubmitterKind::Organization => &mut self.organizacion,
    }
  }

  /// Ajusta `step` al rango `1..=max_steps`.
  pub fn clamp_step(&mut self) {
    self.step = self.step.clamp(1, self.max_steps());
  }

  /// Cambia el tipo de remitente. Si cambia, el asistente vuelve al paso 1.
  pub fn set_submitter_kind(&mut self, kind: SubmitterKind) {
    if self.submitter_kind != kind {
      self.submitter_kind = kind;
      self.step = 1;
    }
  }

  /// Aplica una actualización parcial. La operación es atómica: si algún
  /// campo es desconocido no se modifica nada.
  pub fn apply(&mut self, patch: &FormPatch) -> Result<(), DomainError> {
    let mut next = self.clone();
    for (kind, branch_patch) in patch.branches() {
      let branch = next.branch_mut(kind);
      for (name, value) in &branch_patch.fields {
        branch.set_field(name, value.clone())?;
      }
      if let Some(ubicaciones) = &branch_patch.ubicaciones {
        branch.initiative_mut().ubicaciones = ubicaciones.clone();
      }
    }
    if let Some(step) = patch.step {
      next.step = step;
    }
    if let Some(kind) = patch.submitter_kind {
      next.set_submitter_kind(kind);
    }
    next.clamp_step();
    *self = next;
    Ok(())
  }
}

/// Cambios para una rama: campos de texto por nombre (tal como se
/// persisten) y, opcionalmente, la lista de ubicaciones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchPatch {
  pub fields: IndexMap<String, String>,
  pub ubicaciones: Option<Vec<Ubicacion>>,
}

impl BranchPatch {
  pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
    self.fields.insert(name.to_string(), value.into());
    self
  }
}

/// Actualización parcial del formulario (`updateFormData`). Las ramas se
/// mezclan campo a campo; `step` y `submitter_kind` se reemplazan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPatch {
  pub step: Option<u8>,
  pub submitter_kind: Option<SubmitterKind>,
  pub persona: Option<BranchPatch>,
  pub entidad: Option<BranchPatch>,
  pub organizacion: Option<BranchPatch>,
}

impl FormPatch {
  /// Un único campo en la rama de `kind`.
  pub fn field(kind: SubmitterKind, name: &str, value: impl Into<String>) -> Self {
    Self::default().with_field(kind, name, value)
  }

  pub fn with_field(mut self, kind: SubmitterKind, name: &str, value: impl Into<String>) -> Self {
    let slot = self.slot_mut(kind).get_or_insert_with(BranchPatch::default);
    slot.fields.insert(name.to_string(), value.into());
    self
  }

  pub fn with_locations(mut self, kind: SubmitterKind, ubicaciones: Vec<Ubicacion>) -> Self {
    self.slot_mut(kind).get_or_insert_with(BranchPatch::default).ubicaciones = Some(ubicaciones);
    self
  }

  pub fn with_step(mut self, step: u8) -> Self {
    self.step = Some(step);
    self
  }

  pub fn with_kind(mut self, kind: SubmitterKind) -> Self {
    self.submitter_kind = Some(kind);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.step.is_none()
    && self.submitter_kind.is_none()
    && self.persona.is_none()
    && self.entidad.is_none()
    && self.organizacion.is_none()
  }

  fn slot_mut(&mut self, kind: SubmitterKind) -> &mut Option<BranchPatch> {
    match kind {
      SubmitterKind::Person => &mut self.persona,
      SubmitterKind::Entity => &mut self.entidad,
      SubmitterKind::Organization => &mut self.organizacion,
    }
  }

  fn branches(&self) -> impl Iterator<Item = (SubmitterKind, &BranchPatch)> {
    [(SubmitterKind::Person, &self.persona),
     (SubmitterKind::Entity, &self.entidad),
     (SubmitterKind::Organization, &self.organizacion)].into_iter()
                                                       .filter_map(|(k, p)| p.as_ref().map(|p| (k, p)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_with_unknown_field_changes_nothing() {
    let mut state = FormState::default();
    let patch = FormPatch::field(SubmitterKind::Person, "email", "ana@example.com").with_field(SubmitterKind::Person,
                                                                                              "colorFavorito",
                                                                                              "azul");
    let err = state.apply(&patch).unwrap_err();
    assert!(matches!(err, DomainError::UnknownField { .. }));
    assert_eq!(state, FormState::default());
  }

  #[test]
  fn step_is_clamped_to_kind_bounds() {
    let mut state = FormState::new(SubmitterKind::Entity);
    state.apply(&FormPatch::default().with_step(7)).unwrap();
    assert_eq!(state.step, 2);
    state.apply(&FormPatch::default().with_step(0)).unwrap();
    assert_eq!(state.step, 1);
  }
}
