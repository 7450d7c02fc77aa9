// branches.rs
//
// Ramas de datos del formulario: una por tipo de remitente. Todas comparten
// los identificadores asignados por el servidor (`SubmissionRefs`) y los
// campos de la iniciativa (`InitiativeFields`); difieren en la
// identificación del remitente.
use crate::documents::{default_document_slots, DocumentMetadata, DocumentSlot};
use crate::{DomainError, SubmitterKind};
use iniciativas_api::Ubicacion;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identificadores emitidos por el backend durante la sesión.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionRefs {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub remitente_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub iniciativa_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub radicado: Option<i64>,
}

impl SubmissionRefs {
  /// Un radicado emitido no cambia: reasignar el mismo valor es inocuo,
  /// uno distinto es error.
  pub fn assign_radicado(&mut self, radicado: i64) -> Result<(), DomainError> {
    match self.radicado {
      Some(current) if current != radicado => Err(DomainError::RadicadoConflict { current, attempted: radicado }),
      _ => {
        self.radicado = Some(radicado);
        Ok(())
      }
    }
  }

  pub fn is_empty(&self) -> bool {
    self.remitente_id.is_none() && self.iniciativa_id.is_none() && self.radicado.is_none()
  }
}

/// Campos del paso 2, idénticos para los tres tipos de remitente.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitiativeFields {
  pub tipo_proyecto: String,
  pub titulo: String,
  pub descripcion: String,
  pub poblacion_beneficiada: String,
  pub valor_total: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ubicaciones: Vec<Ubicacion>,
}

impl InitiativeFields {
  pub const FIELDS: [&'static str; 5] = ["tipoProyecto", "titulo", "descripcion", "poblacionBeneficiada", "valorTotal"];

  pub fn get(&self, name: &str) -> Option<&str> {
    match name {
      "tipoProyecto" => Some(&self.tipo_proyecto),
      "titulo" => Some(&self.titulo),
      "descripcion" => Some(&self.descripcion),
      "poblacionBeneficiada" => Some(&self.poblacion_beneficiada),
      "valorTotal" => Some(&self.valor_total),
      _ => None,
    }
  }

  fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
    match name {
      "tipoProyecto" => Some(&mut self.tipo_proyecto),
      "titulo" => Some(&mut self.titulo),
      "descripcion" => Some(&mut self.descripcion),
      "poblacionBeneficiada" => Some(&mut self.poblacion_beneficiada),
      "valorTotal" => Some(&mut self.valor_total),
      _ => None,
    }
  }
}

/// Acceso uniforme a la rama activa, sin importar el tipo de remitente.
pub trait SubmitterData {
  fn kind(&self) -> SubmitterKind;
  fn identity_field(&self, name: &str) -> Option<&str>;
  fn identity_field_mut(&mut self, name: &str) -> Option<&mut String>;
  fn refs(&self) -> &SubmissionRefs;
  fn refs_mut(&mut self) -> &mut SubmissionRefs;
  fn initiative(&self) -> &InitiativeFields;
  fn initiative_mut(&mut self) -> &mut InitiativeFields;

  /// Identificación que se consulta en `GET /remitente/{id}`.
  fn identificacion(&self) -> &str;
  fn email(&self) -> &str;
  fn telefono(&self) -> &str;

  /// Valor de cualquier campo de texto de la rama (identidad o iniciativa).
  fn field(&self, name: &str) -> Option<&str> {
    self.identity_field(name).or_else(|| self.initiative().get(name))
  }

  /// Escribe un campo de texto. Un nombre desconocido es error.
  fn set_field(&mut self, name: &str, value: String) -> Result<(), DomainError> {
    let kind = self.kind();
    if let Some(slot) = self.identity_field_mut(name) {
      *slot = value;
      return Ok(());
    }
    match self.initiative_mut().slot_mut(name) {
      Some(slot) => {
        *slot = value;
        Ok(())
      }
      None => Err(DomainError::UnknownField { kind: kind.to_string(), field: name.to_string() }),
    }
  }
}

fn default_cc() -> String {
  "CC".to_string()
}

fn default_nit() -> String {
  "NIT".to_string()
}

/// `datosPersona`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaData {
  #[serde(flatten)]
  pub refs: SubmissionRefs,
  #[serde(default = "default_cc")]
  pub tipo_documento: String,
  #[serde(default)]
  pub numero_documento: String,
  #[serde(default)]
  pub nombres: String,
  #[serde(default)]
  pub primer_apellido: String,
  #[serde(default)]
  pub segundo_apellido: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub numero_contacto: String,
  #[serde(flatten)]
  pub initiative: InitiativeFields,
  #[serde(default = "default_document_slots")]
  pub documentos: IndexMap<String, DocumentSlot>,
}

impl Default for PersonaData {
  fn default() -> Self {
    Self { refs: SubmissionRefs::default(),
           tipo_documento: default_cc(),
           numero_documento: String::new(),
           nombres: String::new(),
           primer_apellido: String::new(),
           segundo_apellido: String::new(),
           email: String::new(),
           numero_contacto: String::new(),
           initiative: InitiativeFields::default(),
           documentos: default_document_slots() }
  }
}

impl PersonaData {
  pub const IDENTITY_FIELDS: [&'static str; 7] =
    ["tipoDocumento", "numeroDocumento", "nombres", "primerApellido", "segundoApellido", "email", "numeroContacto"];

  /// Reemplaza las casillas por las del manifiesto, conservando el estado
  /// de las que ya existían con la misma clave.
  pub fn replace_document_slots(&mut self, slots: IndexMap<String, DocumentSlot>) {
    let previous = std::mem::take(&mut self.documentos);
    self.documentos = slots.into_iter()
                           .map(|(key, mut slot)| {
                             if let Some(old) = previous.get(&key) {
                               slot.metadata = old.metadata.clone();
                               slot.uploaded = old.uploaded;
                               slot.remote_id = old.remote_id;
                             }
                             (key, slot)
                           })
                           .collect();
  }

  /// Adjunta (o reemplaza) el archivo de una casilla; queda pendiente de
  /// subir hasta `mark_uploaded`.
  pub fn attach_document(&mut self, key: &str, metadata: DocumentMetadata) -> Result<(), DomainError> {
    let slot = self.slot_mut(key)?;
    slot.metadata = Some(metadata);
    slot.uploaded = false;
    slot.remote_id = None;
    Ok(())
  }

  pub fn mark_uploaded(&mut self, key: &str, remote_id: Option<i64>) -> Result<(), DomainError> {
    let slot = self.slot_mut(key)?;
    if slot.metadata.is_none() {
      return Err(DomainError::ValidationError(format!("El documento '{}' no tiene archivo adjunto", key)));
    }
    slot.uploaded = true;
    slot.remote_id = remote_id;
    Ok(())
  }

  pub fn remove_document(&mut self, key: &str) -> Result<(), DomainError> {
    let slot = self.slot_mut(key)?;
    slot.metadata = None;
    slot.uploaded = false;
    slot.remote_id = None;
    Ok(())
  }

  fn slot_mut(&mut self, key: &str) -> Result<&mut DocumentSlot, DomainError> {
    self.documentos
        .get_mut(key)
        .ok_or_else(|| DomainError::UnknownField { kind: SubmitterKind::Person.to_string(), field: key.to_string() })
  }
}

impl SubmitterData for PersonaData {
  fn kind(&self) -> SubmitterKind {
    SubmitterKind::Person
  }

  fn identity_field(&self, name: &str) -> Option<&str> {
    match name {
      "tipoDocumento" => Some(&self.tipo_documento),
      "numeroDocumento" => Some(&self.numero_documento),
      "nombres" => Some(&self.nombres),
      "primerApellido" => Some(&self.primer_apellido),
      "segundoApellido" => Some(&self.segundo_apellido),
      "email" => Some(&self.email),
      "numeroContacto" => Some(&self.numero_contacto),
      _ => None,
    }
  }

  fn identity_field_mut(&mut self, name: &str) -> Option<&mut String> {
    match name {
      "tipoDocumento" => Some(&mut self.tipo_documento),
      "numeroDocumento" => Some(&mut self.numero_documento),
      "nombres" => Some(&mut self.nombres),
      "primerApellido" => Some(&mut self.primer_apellido),
      "segundoApellido" => Some(&mut self.segundo_apellido),
      "email" => Some(&mut self.email),
      "numeroContacto" => Some(&mut self.numero_contacto),
      _ => None,
    }
  }

  fn refs(&self) -> &SubmissionRefs {
    &self.refs
  }

  fn refs_mut(&mut self) -> &mut SubmissionRefs {
    &mut self.refs
  }

  fn initiative(&self) -> &InitiativeFields {
    &self.initiative
  }

  fn initiative_mut(&mut self) -> &mut InitiativeFields {
    &mut self.initiative
  }

  fn identificacion(&self) -> &str {
    &self.numero_documento
  }

  fn email(&self) -> &str {
    &self.email
  }

  fn telefono(&self) -> &str {
    &self.numero_contacto
  }
}

/// `datosEntidad`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntidadData {
  #[serde(flatten)]
  pub refs: SubmissionRefs,
  #[serde(default)]
  pub nombre: String,
  #[serde(default)]
  pub nit: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub telefono: String,
  #[serde(flatten)]
  pub initiative: InitiativeFields,
}

impl EntidadData {
  pub const IDENTITY_FIELDS: [&'static str; 4] = ["nombre", "nit", "email", "telefono"];
}

impl SubmitterData for EntidadData {
  fn kind(&self) -> SubmitterKind {
    SubmitterKind::Entity
  }

  fn identity_field(&self, name: &str) -> Option<&str> {
    match name {
      "nombre" => Some(&self.nombre),
      "nit" => Some(&self.nit),
      "email" => Some(&self.email),
      "telefono" => Some(&self.telefono),
      _ => None,
    }
  }

  fn identity_field_mut(&mut self, name: &str) -> Option<&mut String> {
    match name {
      "nombre" => Some(&mut self.nombre),
      "nit" => Some(&mut self.nit),
      "email" => Some(&mut self.email),
      "telefono" => Some(&mut self.telefono),
      _ => None,
    }
  }

  fn refs(&self) -> &SubmissionRefs {
    &self.refs
  }

  fn refs_mut(&mut self) -> &mut SubmissionRefs {
    &mut self.refs
  }

  fn initiative(&self) -> &InitiativeFields {
    &self.initiative
  }

  fn initiative_mut(&mut self) -> &mut InitiativeFields {
    &mut self.initiative
  }

  fn identificacion(&self) -> &str {
    &self.nit
  }

  fn email(&self) -> &str {
    &self.email
  }

  fn telefono(&self) -> &str {
    &self.telefono
  }
}

/// `datosOrganizacion`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizacionData {
  #[serde(flatten)]
  pub refs: SubmissionRefs,
  #[serde(default)]
  pub nombre_organizacion: String,
  #[serde(default)]
  pub razon_organizacion: String,
  #[serde(default = "default_nit")]
  pub tipo_documento: String,
  #[serde(default)]
  pub numero_documento: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub numero_contacto: String,
  #[serde(flatten)]
  pub initiative: InitiativeFields,
}

impl Default for OrganizacionData {
  fn default() -> Self {
    Self { refs: SubmissionRefs::default(),
           nombre_organizacion: String::new(),
           razon_organizacion: String::new(),
           tipo_documento: default_nit(),
           numero_documento: String::new(),
           email: String::new(),
           numero_contacto: String::new(),
           initiative: InitiativeFields::default() }
  }
}

impl OrganizacionData {
  pub const IDENTITY_FIELDS: [&'static str; 6] =
    ["nombreOrganizacion", "razonOrganizacion", "tipoDocumento", "numeroDocumento", "email", "numeroContacto"];
}

impl SubmitterData for OrganizacionData {
  fn kind(&self) -> SubmitterKind {
    SubmitterKind::Organization
  }

  fn identity_field(&self, name: &str) -> Option<&str> {
    match name {
      "nombreOrganizacion" => Some(&self.nombre_organizacion),
      "razonOrganizacion" => Some(&self.razon_organizacion),
      "tipoDocumento" => Some(&self.tipo_documento),
      "numeroDocumento" => Some(&self.numero_documento),
      "email" => Some(&self.email),
      "numeroContacto" => Some(&self.numero_contacto),
      _ => None,
    }
  }

  fn identity_field_mut(&mut self, name: &str) -> Option<&mut String> {
    match name {
      "nombreOrganizacion" => Some(&mut self.nombre_organizacion),
      "razonOrganizacion" => Some(&mut self.razon_organizacion),
      "tipoDocumento" => Some(&mut self.tipo_documento),
      "numeroDocumento" => Some(&mut self.numero_documento),
      "email" => Some(&mut self.email),
      "numeroContacto" => Some(&mut self.numero_contacto),
      _ => None,
    }
  }

  fn refs(&self) -> &SubmissionRefs {
    &self.refs
  }

  fn refs_mut(&mut self) -> &mut SubmissionRefs {
    &mut self.refs
  }

  fn initiative(&self) -> &InitiativeFields {
    &self.initiative
  }

  fn initiative_mut(&mut self) -> &mut InitiativeFields {
    &mut self.initiative
  }

  /// La organización se identifica por su NIT (razón).
  fn identificacion(&self) -> &str {
    &self.razon_organizacion
  }

  fn email(&self) -> &str {
    &self.email
  }

  fn telefono(&self) -> &str {
    &self.numero_contacto
  }
}
