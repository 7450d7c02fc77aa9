// validation.rs
//
// Validador de campos: reglas declarativas evaluadas en orden fijo
// (obligatorio → patrón → longitud mínima → longitud máxima → personalizada).
// La primera regla que falla determina el mensaje.
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const MSG_REQUIRED: &str = "Este campo es obligatorio";
pub const MSG_INVALID_FORMAT: &str = "Formato inválido";

/// Validador adicional: recibe el valor (ya no vacío) y devuelve el
/// resultado completo.
pub type CustomValidator = Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>;

/// Veredicto sobre un campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
  pub is_valid: bool,
  pub message: String,
}

impl ValidationResult {
  pub fn ok() -> Self {
    Self { is_valid: true, message: String::new() }
  }

  pub fn fail(message: impl Into<String>) -> Self {
    Self { is_valid: false, message: message.into() }
  }
}

/// Reglas de un campo. Se construyen encadenando los métodos.
#[derive(Clone, Default)]
pub struct ValidationRules {
  pub required: bool,
  pub pattern: Option<Regex>,
  pub min_length: Option<usize>,
  pub max_length: Option<usize>,
  pub custom: Option<CustomValidator>,
}

impl ValidationRules {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  /// El patrón debe coincidir con el valor completo; la expresión se ancla
  /// si no lo está.
  pub fn pattern(mut self, re: &Regex) -> Self {
    self.pattern = Some(anchored(re));
    self
  }

  pub fn min_length(mut self, n: usize) -> Self {
    self.min_length = Some(n);
    self
  }

  pub fn max_length(mut self, n: usize) -> Self {
    self.max_length = Some(n);
    self
  }

  pub fn custom<F>(mut self, f: F) -> Self
    where F: Fn(&str) -> ValidationResult + Send + Sync + 'static
  {
    self.custom = Some(Arc::new(f));
    self
  }
}

impl fmt::Debug for ValidationRules {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ValidationRules")
     .field("required", &self.required)
     .field("pattern", &self.pattern.as_ref().map(|r| r.as_str()))
     .field("min_length", &self.min_length)
     .field("max_length", &self.max_length)
     .field("custom", &self.custom.is_some())
     .finish()
  }
}

/// Evalúa `value` contra `rules`. Un valor ausente equivale a vacío.
///
/// Un valor vacío (o sólo espacios) falla `required`; si el campo no es
/// obligatorio pasa el resto de reglas sin evaluarlas. Las longitudes cuentan
/// caracteres Unicode, no bytes.
pub fn validate(value: Option<&str>, rules: &ValidationRules) -> ValidationResult {
  let value = value.unwrap_or("");
  if value.trim().is_empty() {
    return if rules.required { ValidationResult::fail(MSG_REQUIRED) } else { ValidationResult::ok() };
  }
  if let Some(re) = &rules.pattern {
    if !re.is_match(value) {
      return ValidationResult::fail(MSG_INVALID_FORMAT);
    }
  }
  let len = value.chars().count();
  if let Some(min) = rules.min_length {
    if len < min {
      return ValidationResult::fail(format!("Mínimo {} caracteres", min));
    }
  }
  if let Some(max) = rules.max_length {
    if len > max {
      return ValidationResult::fail(format!("Máximo {} caracteres", max));
    }
  }
  match &rules.custom {
    Some(custom) => custom(value),
    None => ValidationResult::ok(),
  }
}

fn anchored(re: &Regex) -> Regex {
  let src = re.as_str();
  if src.starts_with('^') && src.ends_with('$') {
    return re.clone();
  }
  Regex::new(&format!("^(?:{})$", src)).unwrap_or_else(|_| re.clone())
}

/// Mapa ordenado campo → veredicto para el (tipo, paso) actual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationState(IndexMap<String, ValidationResult>);

impl ValidationState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, field: impl Into<String>, result: ValidationResult) {
    self.0.insert(field.into(), result);
  }

  pub fn get(&self, field: &str) -> Option<&ValidationResult> {
    self.0.get(field)
  }

  /// Verdadero si todos los campos evaluados son válidos.
  pub fn is_valid(&self) -> bool {
    self.0.values().all(|r| r.is_valid)
  }

  /// Campos inválidos con su mensaje, en el orden de la tabla de reglas.
  pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().filter(|(_, r)| !r.is_valid).map(|(k, r)| (k.as_str(), r.message.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &ValidationResult)> {
    self.0.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rules::{EMAIL_RE, NIT_RE};

  #[test]
  fn required_rejects_whitespace_only() {
    let rules = ValidationRules::new().required();
    assert_eq!(validate(Some("   "), &rules), ValidationResult::fail(MSG_REQUIRED));
    assert_eq!(validate(None, &rules), ValidationResult::fail(MSG_REQUIRED));
  }

  #[test]
  fn optional_empty_value_skips_other_rules() {
    let rules = ValidationRules::new().pattern(&EMAIL_RE).min_length(5);
    assert!(validate(Some(""), &rules).is_valid);
  }

  #[test]
  fn first_failure_wins_in_fixed_order() {
    let rules = ValidationRules::new().required().pattern(&NIT_RE).min_length(20);
    assert_eq!(validate(Some("abc"), &rules).message, MSG_INVALID_FORMAT);
    assert_eq!(validate(Some("900123456"), &rules).message, "Mínimo 20 caracteres");
  }

  #[test]
  fn lengths_count_characters_not_bytes() {
    let rules = ValidationRules::new().max_length(4);
    assert!(validate(Some("ñandú"), &rules).message.contains("Máximo 4"));
    assert!(validate(Some("ñand"), &rules).is_valid);
  }

  #[test]
  fn pattern_must_match_whole_value() {
    let rules = ValidationRules::new().pattern(&NIT_RE);
    assert!(!validate(Some("900123456 extra"), &rules).is_valid);
  }

  #[test]
  fn custom_runs_last() {
    let rules = ValidationRules::new().required()
                                      .custom(|v| if v == "prohibido" { ValidationResult::fail("No permitido") } else { ValidationResult::ok() });
    assert_eq!(validate(Some("prohibido"), &rules).message, "No permitido");
    assert!(validate(Some("permitido"), &rules).is_valid);
  }
}
