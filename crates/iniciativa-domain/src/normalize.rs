// normalize.rs
//
// Conversión de la rama activa a los cuerpos que espera el backend:
// nombres en mayúscula, email en minúscula, identificadores tipo NIT sin
// separadores y valores numéricos parseados.
use crate::{DomainError, FormState, SubmitterKind};
use iniciativas_api::{CreateIniciativaDto, CreateRemitenteDto, UpdateRemitenteDto};
use serde_json::Value as JsonValue;

/// Origen que se reporta al crear remitentes.
pub const ORIGEN_WEB: &str = "web";

const MSG_MISSING_REMITENTE: &str = "No se encontró el ID del remitente. Por favor complete el paso 1.";

fn upper_or_none(s: &str) -> Option<String> {
  let t = s.trim();
  if t.is_empty() {
    None
  } else {
    Some(t.to_uppercase())
  }
}

fn digits(s: &str) -> String {
  s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Teléfono como entero; vacío o no numérico se envía como 0.
pub fn parse_phone(s: &str) -> i64 {
  digits(s).parse().unwrap_or(0)
}

/// Identificación numérica del remitente activo. Para persona se exige que
/// el documento sea numérico; para entidad y organización se descartan los
/// separadores del NIT.
pub fn identificacion(state: &FormState) -> Result<i64, DomainError> {
  let branch = state.active_branch();
  let raw = branch.identificacion().trim();
  let (cleaned, message) = match state.submitter_kind {
    SubmitterKind::Person => (raw.to_string(), "El número de documento debe ser numérico"),
    SubmitterKind::Entity => (digits(raw), "El NIT debe ser numérico"),
    SubmitterKind::Organization => (digits(raw), "La razón social debe ser numérica"),
  };
  cleaned.parse::<i64>().map_err(|_| DomainError::ValidationError(message.to_string()))
}

/// Cuerpo de `POST /remitente/`.
pub fn remitente_payload(state: &FormState, origen: &str) -> Result<CreateRemitenteDto, DomainError> {
  let identificacion = identificacion(state)?;
  let branch = state.active_branch();
  let (nombre, primer_apellido, segundo_apellido, nombre_entidad) = match state.submitter_kind {
    SubmitterKind::Person => (upper_or_none(&state.persona.nombres),
                              upper_or_none(&state.persona.primer_apellido),
                              upper_or_none(&state.persona.segundo_apellido),
                              None),
    SubmitterKind::Entity => (None, None, None, upper_or_none(&state.entidad.nombre)),
    SubmitterKind::Organization => (None, None, None, upper_or_none(&state.organizacion.nombre_organizacion)),
  };
  Ok(CreateRemitenteDto { identificacion,
                          tipo: state.submitter_kind.tipo(),
                          nombre,
                          primer_apellido,
                          segundo_apellido,
                          nombre_entidad,
                          email: branch.email().trim().to_lowercase(),
                          telefono: parse_phone(branch.telefono()),
                          creado_desde: origen.to_string() })
}

/// Cuerpo de `POST /remitente/{id}`: sólo email y teléfono.
pub fn remitente_update_payload(state: &FormState) -> UpdateRemitenteDto {
  let branch = state.active_branch();
  UpdateRemitenteDto { email: branch.email().trim().to_lowercase(), telefono: parse_phone(branch.telefono()) }
}

/// Un id de catálogo viaja como número si lo es; si no, como su código.
pub fn id_or_code(s: &str) -> JsonValue {
  let t = s.trim();
  match t.parse::<i64>() {
    Ok(n) => JsonValue::from(n),
    Err(_) => JsonValue::from(t),
  }
}

/// Cuerpo de `POST /iniciativas/{entidadId}/`. Requiere el id de remitente
/// del paso 1.
pub fn iniciativa_payload(state: &FormState, entidad_id: i64) -> Result<CreateIniciativaDto, DomainError> {
  let branch = state.active_branch();
  let radicado_por =
    branch.refs().remitente_id.ok_or_else(|| DomainError::ValidationError(MSG_MISSING_REMITENTE.to_string()))?;
  let ini = branch.initiative();
  let valor_total = ini.valor_total
                       .trim()
                       .parse::<f64>()
                       .ok()
                       .filter(|v| v.is_finite() && *v >= 0.0)
                       .ok_or_else(|| DomainError::ValidationError("El valor total debe ser numérico".to_string()))?;
  Ok(CreateIniciativaDto { entidad: entidad_id,
                           radicado_por,
                           tipo_proyecto: id_or_code(&ini.tipo_proyecto),
                           titulo: ini.titulo.trim().to_string(),
                           descripcion: ini.descripcion.trim().to_string(),
                           poblacion_beneficiada: id_or_code(&ini.poblacion_beneficiada),
                           valor_total,
                           creado_desde: state.submitter_kind.as_str().to_string(),
                           radicado: None,
                           ubicaciones: ini.ubicaciones.clone() })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phone_defaults_to_zero() {
    assert_eq!(parse_phone(""), 0);
    assert_eq!(parse_phone("300 123 4567"), 3001234567);
  }

  #[test]
  fn catalog_ids_keep_codes() {
    assert_eq!(id_or_code(" 3 "), JsonValue::from(3));
    assert_eq!(id_or_code("SOCIAL"), JsonValue::from("SOCIAL"));
  }
}
