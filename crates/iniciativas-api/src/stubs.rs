// Archivo: stubs.rs
// Propósito: implementación en memoria de `IniciativasApi` para pruebas y
// para el modo sin conexión del binario. Lleva la cuenta de llamadas por
// operación y permite inyectar fallos de una sola vez.
use crate::client::IniciativasApi;
use crate::errors::ApiError;
use crate::types::{CreateIniciativaDto, CreateRemitenteDto, DocumentUpload, DocumentoCargado, DocumentoRequerido,
                   Iniciativa, PoblacionObjetivo, Remitente, TipoProyecto, UpdateRemitenteDto};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Primer radicado que emite el stub.
pub const FIRST_STUB_RADICADO: i64 = 202501000123;

/// Operaciones observables del stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
  FindRemitente,
  CreateRemitente,
  UpdateRemitente,
  CreateIniciativa,
  FindIniciativa,
  ListDocumentos,
  UploadDocumento,
  TiposProyecto,
  PoblacionesObjetivo,
  DocumentosRequeridos,
}

struct StubState {
  remitentes: Vec<Remitente>,
  iniciativas: Vec<Iniciativa>,
  documentos: HashMap<i64, Vec<DocumentoCargado>>,
  manifests: HashMap<i64, Vec<DocumentoRequerido>>,
  tipos: Vec<TipoProyecto>,
  poblaciones: Vec<PoblacionObjetivo>,
  next_remitente_id: i64,
  next_iniciativa_id: i64,
  next_documento_id: i64,
  next_radicado: i64,
  calls: HashMap<ApiOperation, usize>,
  pending_failures: HashMap<ApiOperation, (u16, String)>,
}

/// Backend simulado en memoria (no durable).
pub struct InMemoryIniciativasApi {
  state: Mutex<StubState>,
}

impl InMemoryIniciativasApi {
  /// Crea un stub con catálogos de ejemplo: dos tipos de proyecto, dos
  /// poblaciones objetivo y un manifiesto de tres documentos obligatorios
  /// para el tipo 1.
  pub fn new() -> Self {
    let manifest = vec![DocumentoRequerido { id: 1,
                                             secuencia: Some(1),
                                             nombre_archivo: "cartaPresentacion".into(),
                                             detalle: Some("Carta de presentación del proyecto".into()),
                                             obligatorio: true },
                        DocumentoRequerido { id: 2,
                                             secuencia: Some(2),
                                             nombre_archivo: "anexoTecnico".into(),
                                             detalle: Some("Anexo técnico".into()),
                                             obligatorio: true },
                        DocumentoRequerido { id: 3,
                                             secuencia: Some(3),
                                             nombre_archivo: "mgaNacional".into(),
                                             detalle: Some("MGA Nacional".into()),
                                             obligatorio: true }];
    let state = StubState { remitentes: Vec::new(),
                            iniciativas: Vec::new(),
                            documentos: HashMap::new(),
                            manifests: HashMap::from([(1, manifest)]),
                            tipos: vec![TipoProyecto { id: 1, tipo_proyecto: "Infraestructura social".into() },
                                        TipoProyecto { id: 2, tipo_proyecto: "Cultura".into() }],
                            poblaciones: vec![PoblacionObjetivo { id: 1, poblacion_objetivo: "Primera infancia".into() },
                                              PoblacionObjetivo { id: 2, poblacion_objetivo: "Adulto mayor".into() }],
                            next_remitente_id: 1,
                            next_iniciativa_id: 1,
                            next_documento_id: 1,
                            next_radicado: FIRST_STUB_RADICADO,
                            calls: HashMap::new(),
                            pending_failures: HashMap::new() };
    Self { state: Mutex::new(state) }
  }

  fn lock(&self) -> MutexGuard<'_, StubState> {
    self.state.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Registra la llamada y devuelve el fallo pendiente para `op`, si hay.
  fn enter(&self, op: ApiOperation) -> Result<MutexGuard<'_, StubState>, ApiError> {
    let mut st = self.lock();
    *st.calls.entry(op).or_insert(0) += 1;
    if let Some((status, message)) = st.pending_failures.remove(&op) {
      return Err(ApiError::Status { status, message: Some(message) });
    }
    Ok(st)
  }

  /// La próxima llamada a `op` falla con un 500 y el mensaje dado.
  pub fn fail_next(&self, op: ApiOperation, message: &str) {
    self.lock().pending_failures.insert(op, (500, message.to_string()));
  }

  /// La próxima llamada a `op` falla con el estado HTTP indicado.
  pub fn fail_next_with_status(&self, op: ApiOperation, status: u16, message: &str) {
    self.lock().pending_failures.insert(op, (status, message.to_string()));
  }

  /// Número de llamadas recibidas para `op` (incluye las fallidas).
  pub fn calls(&self, op: ApiOperation) -> usize {
    self.lock().calls.get(&op).copied().unwrap_or(0)
  }

  /// Total de llamadas recibidas.
  pub fn total_calls(&self) -> usize {
    self.lock().calls.values().sum()
  }

  /// Reemplaza el manifiesto de documentos para un tipo de proyecto.
  pub fn with_manifest(self, tipo_proyecto_id: i64, manifest: Vec<DocumentoRequerido>) -> Self {
    self.lock().manifests.insert(tipo_proyecto_id, manifest);
    self
  }

  /// Precarga un remitente existente (para probar la búsqueda por
  /// identificación).
  pub fn with_remitente(self, identificacion: i64, email: &str) -> Self {
    {
      let mut st = self.lock();
      let id = st.next_remitente_id;
      st.next_remitente_id += 1;
      st.remitentes.push(Remitente { id,
                                     identificacion: Some(identificacion),
                                     nombre: None,
                                     primer_apellido: None,
                                     segundo_apellido: None,
                                     nombre_entidad: None,
                                     email: Some(email.to_string()),
                                     telefono: None,
                                     tipo: Some(1) });
    }
    self
  }

  /// Copia de los remitentes creados.
  pub fn remitentes(&self) -> Vec<Remitente> {
    self.lock().remitentes.clone()
  }

  /// Copia de las iniciativas creadas.
  pub fn iniciativas(&self) -> Vec<Iniciativa> {
    self.lock().iniciativas.clone()
  }

  /// Documentos subidos para una iniciativa.
  pub fn documentos_de(&self, iniciativa_id: i64) -> Vec<DocumentoCargado> {
    self.lock().documentos.get(&iniciativa_id).cloned().unwrap_or_default()
  }
}

impl Default for InMemoryIniciativasApi {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl IniciativasApi for InMemoryIniciativasApi {
  async fn find_remitente(&self, identificacion: &str) -> Result<Option<Remitente>, ApiError> {
    let st = self.enter(ApiOperation::FindRemitente)?;
    let wanted: Option<i64> = identificacion.trim().parse().ok();
    Ok(st.remitentes.iter().find(|r| wanted.is_some() && r.identificacion == wanted).cloned())
  }

  async fn create_remitente(&self, dto: &CreateRemitenteDto) -> Result<Remitente, ApiError> {
    let mut st = self.enter(ApiOperation::CreateRemitente)?;
    let id = st.next_remitente_id;
    st.next_remitente_id += 1;
    let r = Remitente { id,
                        identificacion: Some(dto.identificacion),
                        nombre: dto.nombre.clone(),
                        primer_apellido: dto.primer_apellido.clone(),
                        segundo_apellido: dto.segundo_apellido.clone(),
                        nombre_entidad: dto.nombre_entidad.clone(),
                        email: Some(dto.email.clone()),
                        telefono: Some(dto.telefono),
                        tipo: Some(dto.tipo as i64) };
    st.remitentes.push(r.clone());
    Ok(r)
  }

  async fn update_remitente(&self, id: i64, dto: &UpdateRemitenteDto) -> Result<Remitente, ApiError> {
    let mut st = self.enter(ApiOperation::UpdateRemitente)?;
    let r = st.remitentes
              .iter_mut()
              .find(|r| r.id == id)
              .ok_or(ApiError::Status { status: 404, message: Some(format!("Remitente {} no existe", id)) })?;
    r.email = Some(dto.email.clone());
    r.telefono = Some(dto.telefono);
    Ok(r.clone())
  }

  async fn create_iniciativa(&self, entidad_id: i64, dto: &CreateIniciativaDto) -> Result<Iniciativa, ApiError> {
    let mut st = self.enter(ApiOperation::CreateIniciativa)?;
    if !st.remitentes.iter().any(|r| r.id == dto.radicado_por) {
      return Err(ApiError::Status { status: 400,
                                    message: Some(format!("El remitente {} no existe", dto.radicado_por)) });
    }
    let id = st.next_iniciativa_id;
    st.next_iniciativa_id += 1;
    let radicado = st.next_radicado;
    st.next_radicado += 1;
    let ini = Iniciativa { id,
                           radicado: Some(radicado),
                           titulo: Some(dto.titulo.clone()),
                           descripcion: Some(dto.descripcion.clone()),
                           valor_total: Some(dto.valor_total),
                           fecha_creacion: None,
                           creado_desde: Some(dto.creado_desde.clone()),
                           estado: None,
                           tipo_proyecto: Some(dto.tipo_proyecto.clone()),
                           radicado_por: Some(serde_json::json!(dto.radicado_por)) };
    log::debug!("stub: iniciativa {} radicada para entidad {}", radicado, entidad_id);
    st.iniciativas.push(ini.clone());
    Ok(ini)
  }

  async fn find_iniciativa(&self, _entidad_id: i64, radicado_or_id: &str) -> Result<Option<Iniciativa>, ApiError> {
    let st = self.enter(ApiOperation::FindIniciativa)?;
    let wanted: i64 = match radicado_or_id.trim().parse() {
      Ok(n) => n,
      Err(_) => return Ok(None),
    };
    Ok(st.iniciativas.iter().find(|i| i.radicado == Some(wanted) || i.id == wanted).cloned())
  }

  async fn list_documentos(&self, iniciativa_id: i64) -> Result<Vec<DocumentoCargado>, ApiError> {
    let st = self.enter(ApiOperation::ListDocumentos)?;
    Ok(st.documentos.get(&iniciativa_id).cloned().unwrap_or_default())
  }

  async fn upload_documento(&self, iniciativa_id: i64, upload: DocumentUpload) -> Result<DocumentoCargado, ApiError> {
    let mut st = self.enter(ApiOperation::UploadDocumento)?;
    if !st.iniciativas.iter().any(|i| i.id == iniciativa_id) {
      return Err(ApiError::Status { status: 404, message: Some("Iniciativa no encontrada".into()) });
    }
    let id = st.next_documento_id;
    st.next_documento_id += 1;
    let doc = DocumentoCargado { id: Some(id),
                                 tipo_documento: Some(upload.tipo_documento),
                                 nombre: Some(upload.nombre_archivo.clone()),
                                 archivo: Some(format!("documentos/{}/{}", iniciativa_id, upload.nombre_archivo)) };
    st.documentos.entry(iniciativa_id).or_default().push(doc.clone());
    Ok(doc)
  }

  async fn tipos_proyecto(&self, _entidad_id: i64) -> Result<Vec<TipoProyecto>, ApiError> {
    Ok(self.enter(ApiOperation::TiposProyecto)?.tipos.clone())
  }

  async fn poblaciones_objetivo(&self, _entidad_id: i64) -> Result<Vec<PoblacionObjetivo>, ApiError> {
    Ok(self.enter(ApiOperation::PoblacionesObjetivo)?.poblaciones.clone())
  }

  async fn documentos_requeridos(&self, _entidad_id: i64, tipo_proyecto_id: i64)
                                 -> Result<Vec<DocumentoRequerido>, ApiError> {
    let st = self.enter(ApiOperation::DocumentosRequeridos)?;
    Ok(st.manifests.get(&tipo_proyecto_id).cloned().unwrap_or_default())
  }
}
