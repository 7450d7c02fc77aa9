// rules.rs
//
// Tablas de reglas por (tipo de remitente, paso). Cada entrada nombra el
// campo tal como se persiste en la rama de datos.
use crate::validation::{validate, ValidationRules, ValidationState};
use crate::{FormState, SubmitterKind};
use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("regex de email"));
pub static NIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9,10}-?\d?$").expect("regex de NIT"));
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("regex de teléfono"));
pub static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("regex de dígitos"));
pub static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("regex de valor"));

/// Regla de un campo dentro de la tabla de un paso.
#[derive(Debug, Clone)]
pub struct FieldRule {
  pub name: String,
  pub label: String,
  pub rules: ValidationRules,
}

impl FieldRule {
  fn new(name: &str, label: &str, rules: ValidationRules) -> Self {
    Self { name: name.to_string(), label: label.to_string(), rules }
  }
}

fn email_rule() -> FieldRule {
  FieldRule::new("email", "Correo electrónico", ValidationRules::new().required().pattern(&EMAIL_RE))
}

fn phone_rule(name: &str) -> FieldRule {
  FieldRule::new(name, "Número de contacto", ValidationRules::new().required().pattern(&PHONE_RE))
}

fn identity_rules(kind: SubmitterKind) -> Vec<FieldRule> {
  match kind {
    SubmitterKind::Person => {
      vec![FieldRule::new("numeroDocumento",
                          "Número de documento",
                          ValidationRules::new().required().pattern(&DIGITS_RE).min_length(6).max_length(12)),
           FieldRule::new("nombres", "Nombres", ValidationRules::new().required().min_length(2)),
           FieldRule::new("primerApellido", "Primer apellido", ValidationRules::new().required().min_length(2)),
           email_rule(),
           phone_rule("numeroContacto"),]
    }
    SubmitterKind::Entity => {
      vec![FieldRule::new("nombre", "Nombre de la entidad", ValidationRules::new().required().min_length(2)),
           FieldRule::new("nit", "NIT", ValidationRules::new().required().pattern(&NIT_RE)),
           email_rule(),
           phone_rule("telefono"),]
    }
    SubmitterKind::Organization => {
      vec![FieldRule::new("nombreOrganizacion",
                          "Nombre de la organización",
                          ValidationRules::new().required().min_length(2)),
           FieldRule::new("razonOrganizacion", "NIT de la organización", ValidationRules::new().required().pattern(&NIT_RE)),
           email_rule(),
           phone_rule("numeroContacto"),]
    }
  }
}

fn initiative_rules() -> Vec<FieldRule> {
  vec![FieldRule::new("tipoProyecto", "Tipo de proyecto", ValidationRules::new().required()),
       FieldRule::new("titulo", "Título", ValidationRules::new().required().min_length(5).max_length(100)),
       FieldRule::new("descripcion", "Descripción", ValidationRules::new().required().min_length(10).max_length(500)),
       FieldRule::new("poblacionBeneficiada", "Población beneficiada", ValidationRules::new().required()),
       FieldRule::new("valorTotal", "Valor total", ValidationRules::new().required().pattern(&AMOUNT_RE)),]
}

/// Tabla de reglas de los pasos 1 y 2. El paso de documentos depende de las
/// casillas del estado; ver `rules_for`.
pub fn field_rules(kind: SubmitterKind, step: u8) -> Vec<FieldRule> {
  match step {
    1 => identity_rules(kind),
    2 => initiative_rules(),
    _ => Vec::new(),
  }
}

/// Tabla de reglas efectiva para el paso actual del estado.
pub fn rules_for(state: &FormState) -> Vec<FieldRule> {
  match (state.submitter_kind, state.step) {
    (SubmitterKind::Person, 3) => state.persona
                                       .documentos
                                       .iter()
                                       .filter(|(_, slot)| slot.obligatorio)
                                       .map(|(key, slot)| FieldRule::new(key, &slot.label, ValidationRules::new().required()))
                                       .collect(),
    (kind, step) => field_rules(kind, step),
  }
}

/// Valor que se valida para un campo. Para documentos es el nombre del
/// archivo, y sólo cuando la subida fue confirmada.
pub fn field_value<'a>(state: &'a FormState, name: &str) -> Option<&'a str> {
  if state.submitter_kind == SubmitterKind::Person && state.step == 3 {
    if let Some(slot) = state.persona.documentos.get(name) {
      return slot.metadata.as_ref().filter(|_| slot.uploaded).map(|m| m.filename.as_str());
    }
  }
  state.active_branch().field(name)
}

/// Regla de un campo concreto del paso actual, si la tabla la define.
pub fn rule_for_field(state: &FormState, name: &str) -> Option<FieldRule> {
  rules_for(state).into_iter().find(|r| r.name == name)
}

/// Recalcula el mapa de validación completo del paso actual.
pub fn validate_step(state: &FormState) -> ValidationState {
  let mut out = ValidationState::new();
  for rule in rules_for(state) {
    let verdict = validate(field_value(state, &rule.name), &rule.rules);
    out.insert(rule.name, verdict);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tables_list_fields_in_declared_order() {
    let names: Vec<_> = field_rules(SubmitterKind::Entity, 1).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["nombre", "nit", "email", "telefono"]);
    assert_eq!(field_rules(SubmitterKind::Organization, 2).len(), 5);
    assert!(field_rules(SubmitterKind::Entity, 3).is_empty());
  }

  #[test]
  fn documents_step_uses_mandatory_slots() {
    let mut state = FormState::new(SubmitterKind::Person);
    state.step = 3;
    let names: Vec<_> = rules_for(&state).into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["cartaPresentacion", "anexoTecnico", "mgaNacional"]);
  }
}
