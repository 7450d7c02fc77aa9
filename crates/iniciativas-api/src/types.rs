use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Registro de remitente tal como lo devuelve el backend. Sólo `id` es
/// obligatorio; el resto se tolera ausente porque distintas vistas del
/// backend devuelven formas distintas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remitente {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub identificacion: Option<i64>,
  #[serde(default)]
  pub nombre: Option<String>,
  #[serde(default)]
  pub primer_apellido: Option<String>,
  #[serde(default)]
  pub segundo_apellido: Option<String>,
  #[serde(default)]
  pub nombre_entidad: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub telefono: Option<i64>,
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub tipo: Option<i64>,
}

/// Cuerpo de `POST /remitente/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRemitenteDto {
  pub identificacion: i64,
  pub tipo: u8,
  pub nombre: Option<String>,
  pub primer_apellido: Option<String>,
  pub segundo_apellido: Option<String>,
  pub nombre_entidad: Option<String>,
  pub email: String,
  pub telefono: i64,
  pub creado_desde: String,
}

/// Cuerpo de `POST /remitente/{id}`: el backend sólo acepta email y
/// teléfono en la actualización.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRemitenteDto {
  pub email: String,
  pub telefono: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ubicacion {
  pub departamento: String,
  pub ciudad: String,
}

/// Cuerpo de `POST /iniciativas/{entidadId}/`. `radicado` viaja siempre
/// como `null` para que el backend lo genere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIniciativaDto {
  pub entidad: i64,
  pub radicado_por: i64,
  pub tipo_proyecto: JsonValue,
  pub titulo: String,
  pub descripcion: String,
  pub poblacion_beneficiada: JsonValue,
  pub valor_total: f64,
  pub creado_desde: String,
  pub radicado: Option<i64>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ubicaciones: Vec<Ubicacion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estado {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  pub nombre_estado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipoProyecto {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  pub tipo_proyecto: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoblacionObjetivo {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  pub poblacion_objetivo: String,
}

/// Registro de iniciativa devuelto al crear o consultar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iniciativa {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub radicado: Option<i64>,
  #[serde(default)]
  pub titulo: Option<String>,
  #[serde(default)]
  pub descripcion: Option<String>,
  #[serde(default, deserialize_with = "lenient::opt_f64")]
  pub valor_total: Option<f64>,
  #[serde(default)]
  pub fecha_creacion: Option<String>,
  #[serde(default)]
  pub creado_desde: Option<String>,
  #[serde(default)]
  pub estado: Option<Estado>,
  /// Puede llegar como objeto `{id, tipo_proyecto}` o sólo como id.
  #[serde(default)]
  pub tipo_proyecto: Option<JsonValue>,
  #[serde(default)]
  pub radicado_por: Option<JsonValue>,
}

/// Entrada del manifiesto `documentos-proyecto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentoRequerido {
  #[serde(deserialize_with = "lenient::i64_value")]
  pub id: i64,
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub secuencia: Option<i64>,
  pub nombre_archivo: String,
  #[serde(default)]
  pub detalle: Option<String>,
  #[serde(default)]
  pub obligatorio: bool,
}

/// Documento ya almacenado para una iniciativa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentoCargado {
  #[serde(default, deserialize_with = "lenient::opt_i64")]
  pub id: Option<i64>,
  #[serde(default)]
  pub tipo_documento: Option<String>,
  #[serde(default)]
  pub nombre: Option<String>,
  #[serde(default)]
  pub archivo: Option<String>,
}

/// Archivo a subir en `POST /iniciativas/{id}/documentos/`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
  pub tipo_documento: String,
  pub nombre_archivo: String,
  pub mime: String,
  pub contenido: Vec<u8>,
}

// El backend mezcla números y cadenas numéricas para ids, teléfonos y
// valores; estos helpers aceptan ambas formas.
mod lenient {
  use super::*;
  use serde::de::Error;

  fn as_i64(v: &JsonValue) -> Option<i64> {
    match v {
      JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
      JsonValue::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }

  pub fn i64_value<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = JsonValue::deserialize(d)?;
    as_i64(&v).ok_or_else(|| D::Error::custom(format!("se esperaba un entero, se recibió {}", v)))
  }

  pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let v = Option::<JsonValue>::deserialize(d)?;
    Ok(v.as_ref().and_then(as_i64))
  }

  pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<JsonValue>::deserialize(d)?;
    Ok(match v {
      Some(JsonValue::Number(n)) => n.as_f64(),
      Some(JsonValue::String(s)) => s.trim().parse().ok(),
      _ => None,
    })
  }
}
