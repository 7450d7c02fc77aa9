// submitter_kind.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tipo de remitente. Determina la rama de datos activa y cuántos pasos
/// tiene el asistente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubmitterKind {
  #[default]
  #[serde(rename = "persona")]
  Person,
  #[serde(rename = "entidad")]
  Entity,
  #[serde(rename = "organizacion")]
  Organization,
}

impl SubmitterKind {
  pub const ALL: [SubmitterKind; 3] = [SubmitterKind::Person, SubmitterKind::Entity, SubmitterKind::Organization];

  /// Persona: identificación, iniciativa y documentos. Entidad y
  /// organización no cargan documentos.
  pub fn max_steps(self) -> u8 {
    match self {
      SubmitterKind::Person => 3,
      SubmitterKind::Entity | SubmitterKind::Organization => 2,
    }
  }

  /// Discriminador `tipo` del recurso remitente.
  pub fn tipo(self) -> u8 {
    match self {
      SubmitterKind::Person => 1,
      SubmitterKind::Entity => 2,
      SubmitterKind::Organization => 3,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SubmitterKind::Person => "persona",
      SubmitterKind::Entity => "entidad",
      SubmitterKind::Organization => "organizacion",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      SubmitterKind::Person => "Persona natural",
      SubmitterKind::Entity => "Entidad pública",
      SubmitterKind::Organization => "Organización privada",
    }
  }
}

impl fmt::Display for SubmitterKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SubmitterKind {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "persona" => Ok(SubmitterKind::Person),
      "entidad" => Ok(SubmitterKind::Entity),
      "organizacion" | "organización" => Ok(SubmitterKind::Organization),
      other => Err(DomainError::ValidationError(format!("Tipo de remitente desconocido: {}", other))),
    }
  }
}
