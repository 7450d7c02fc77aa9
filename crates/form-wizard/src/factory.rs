//! Fábrica de pasos por tipo de remitente.

use crate::steps::{DocumentsStep, IdentityStep, InitiativeStep, WizardStep};
use iniciativa_domain::SubmitterKind;

/// Pasos en orden para el tipo de remitente. La longitud coincide con
/// `SubmitterKind::max_steps`.
pub fn steps_for(kind: SubmitterKind) -> Vec<Box<dyn WizardStep>> {
  let mut steps: Vec<Box<dyn WizardStep>> = vec![Box::new(IdentityStep), Box::new(InitiativeStep)];
  if kind == SubmitterKind::Person {
    steps.push(Box::new(DocumentsStep));
  }
  steps
}

/// Paso `number` (1-based) del tipo de remitente.
pub fn step_at(kind: SubmitterKind, number: u8) -> Option<Box<dyn WizardStep>> {
  steps_for(kind).into_iter().find(|s| s.number() == number)
}
