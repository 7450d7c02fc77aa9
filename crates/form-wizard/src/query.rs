//! Consulta de iniciativas radicadas y catálogos del paso 2.

use crate::errors::WizardError;
use iniciativa_domain::format::{format_cop, format_date, NO_AMOUNT};
use iniciativas_api::{DocumentoCargado, Iniciativa, IniciativasApi, PoblacionObjetivo, TipoProyecto};
use log::warn;

pub const MSG_EMPTY_RADICADO: &str = "Por favor ingrese un número de radicado";
pub const MSG_NOT_FOUND: &str = "No se encontró ninguna iniciativa con el radicado proporcionado";
pub const MSG_LOOKUP_FAILED: &str =
  "Ocurrió un error al consultar la iniciativa. Por favor intente de nuevo más tarde.";
pub const MSG_DOCUMENTS_FAILED: &str = "No se pudieron cargar los documentos adjuntos.";
pub const MSG_NO_DOCUMENTS: &str = "Sin documentos adjuntos";

/// Busca una iniciativa por radicado o id.
pub async fn find_iniciativa(api: &dyn IniciativasApi, entidad_id: i64, input: &str)
                             -> Result<Iniciativa, WizardError> {
  let wanted = input.trim();
  if wanted.is_empty() {
    return Err(WizardError::Validation(MSG_EMPTY_RADICADO.to_string()));
  }
  match api.find_iniciativa(entidad_id, wanted).await {
    Ok(Some(ini)) => Ok(ini),
    Ok(None) => Err(WizardError::NotFound(MSG_NOT_FOUND.to_string())),
    Err(e) if e.is_not_found() => Err(WizardError::NotFound(MSG_NOT_FOUND.to_string())),
    Err(e) => {
      warn!("consulta de iniciativa {} fallida: {}", wanted, e);
      Err(WizardError::Other(MSG_LOOKUP_FAILED.to_string()))
    }
  }
}

/// Texto de una consulta fallida.
pub fn lookup_message(err: &WizardError) -> String {
  match err {
    WizardError::Validation(m) | WizardError::NotFound(m) | WizardError::Other(m) => m.clone(),
    _ => MSG_LOOKUP_FAILED.to_string(),
  }
}

/// Filas etiqueta/valor para mostrar una iniciativa.
pub fn summary_lines(ini: &Iniciativa) -> Vec<(&'static str, String)> {
  let dash = || "-".to_string();
  vec![("Radicado", ini.radicado.map(|r| r.to_string()).unwrap_or_else(dash)),
       ("Título", ini.titulo.clone().unwrap_or_else(dash)),
       ("Descripción", ini.descripcion.clone().unwrap_or_else(dash)),
       ("Valor total", ini.valor_total.map(format_cop).unwrap_or_else(|| NO_AMOUNT.to_string())),
       ("Fecha de radicación", format_date(ini.fecha_creacion.as_deref())),
       ("Estado", ini.estado.as_ref().map(|e| e.nombre_estado.clone()).unwrap_or_else(dash))]
}

/// Documentos adjuntos de una iniciativa consultada. Un fallo no invalida
/// el resumen ya mostrado; sólo se informa con su propio mensaje.
pub async fn documentos_adjuntos(api: &dyn IniciativasApi, iniciativa_id: i64)
                                 -> Result<Vec<DocumentoCargado>, WizardError> {
  match api.list_documentos(iniciativa_id).await {
    Ok(docs) => Ok(docs),
    Err(e) => {
      warn!("documentos de la iniciativa {} no disponibles: {}", iniciativa_id, e);
      Err(WizardError::Other(MSG_DOCUMENTS_FAILED.to_string()))
    }
  }
}

/// Una fila por documento: tipo y nombre del archivo.
pub fn document_lines(docs: &[DocumentoCargado]) -> Vec<String> {
  if docs.is_empty() {
    return vec![MSG_NO_DOCUMENTS.to_string()];
  }
  docs.iter()
      .map(|d| {
        format!("{}: {}",
                d.tipo_documento.as_deref().unwrap_or("Documento"),
                d.nombre.as_deref().or(d.archivo.as_deref()).unwrap_or("-"))
      })
      .collect()
}

/// Listas de opciones del paso 2.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
  pub tipos_proyecto: Vec<TipoProyecto>,
  pub poblaciones: Vec<PoblacionObjetivo>,
}

pub async fn step_options(api: &dyn IniciativasApi, entidad_id: i64) -> Result<StepOptions, WizardError> {
  let (tipos_proyecto, poblaciones) =
    tokio::try_join!(api.tipos_proyecto(entidad_id), api.poblaciones_objetivo(entidad_id))?;
  Ok(StepOptions { tipos_proyecto, poblaciones })
}
