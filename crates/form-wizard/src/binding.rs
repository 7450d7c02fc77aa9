//! Enlace genérico campo-formulario.

use crate::errors::WizardError;
use crate::session::FormSession;
use iniciativa_domain::{rule_for_field, rules_for, validate, EntidadData, FormPatch, FormState, OrganizacionData, PersonaData,
                        SubmitterKind, ValidationResult, ValidationRules};

/// Un campo de la rama `kind`. Lee el valor actual, escribe a través de
/// `update_form_data` y devuelve el veredicto del campo sin tocar el mapa de
/// validación.
#[derive(Debug, Clone)]
pub struct FieldBinding {
  name: String,
  label: String,
  kind: SubmitterKind,
  rules: ValidationRules,
}

impl FieldBinding {
  pub fn new(name: impl Into<String>, kind: SubmitterKind, rules: ValidationRules) -> Self {
    let name = name.into();
    Self { label: default_label(&name).to_string(), name, kind, rules }
  }

  /// Enlace con las reglas de la tabla del paso actual. Un campo fuera de la
  /// tabla queda sin reglas.
  pub fn for_field(state: &FormState, name: &str) -> Self {
    match rule_for_field(state, name) {
      Some(rule) => Self { name: rule.name, label: rule.label, kind: state.submitter_kind, rules: rule.rules },
      None => Self::new(name, state.submitter_kind, ValidationRules::default()),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn kind(&self) -> SubmitterKind {
    self.kind
  }

  pub fn value<'a>(&self, state: &'a FormState) -> &'a str {
    state.branch(self.kind).field(&self.name).unwrap_or("")
  }

  pub fn check(&self, value: &str) -> ValidationResult {
    validate(Some(value), &self.rules)
  }

  pub fn write(&self, session: &mut FormSession, value: impl Into<String>) -> Result<ValidationResult, WizardError> {
    let value = value.into();
    let verdict = self.check(&value);
    session.update_form_data(&FormPatch::field(self.kind, &self.name, value))?;
    Ok(verdict)
  }
}

/// Campos editables del paso actual. En el paso 1 son todos los datos de
/// identificación del tipo activo, incluidos los opcionales sin regla.
pub fn step_fields(state: &FormState) -> Vec<FieldBinding> {
  let identity: &[&str] = match state.submitter_kind {
    SubmitterKind::Person => &PersonaData::IDENTITY_FIELDS,
    SubmitterKind::Entity => &EntidadData::IDENTITY_FIELDS,
    SubmitterKind::Organization => &OrganizacionData::IDENTITY_FIELDS,
  };
  if state.step == 1 {
    identity.iter().map(|name| FieldBinding::for_field(state, name)).collect()
  } else {
    rules_for(state).into_iter()
                    .map(|r| FieldBinding { name: r.name, label: r.label, kind: state.submitter_kind, rules: r.rules })
                    .collect()
  }
}

fn default_label(name: &str) -> &str {
  match name {
    "tipoDocumento" => "Tipo de documento",
    "numeroDocumento" => "Número de documento",
    "segundoApellido" => "Segundo apellido",
    other => other,
  }
}
