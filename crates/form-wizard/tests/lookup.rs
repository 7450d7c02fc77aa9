use form_storage::{FormStorage, InMemoryKeyValueStore};
use form_wizard::query::{self, document_lines, lookup_message, summary_lines, MSG_DOCUMENTS_FAILED, MSG_EMPTY_RADICADO,
                         MSG_LOOKUP_FAILED, MSG_NOT_FOUND, MSG_NO_DOCUMENTS};
use form_wizard::{WizardConfig, WizardController, WizardError};
use iniciativas_api::{ApiOperation, CreateIniciativaDto, CreateRemitenteDto, DocumentUpload, IniciativasApi,
                      InMemoryIniciativasApi, FIRST_STUB_RADICADO};
use serde_json::json;
use std::sync::Arc;

async fn api_with_one_initiative() -> Arc<InMemoryIniciativasApi> {
  let api = Arc::new(InMemoryIniciativasApi::new());
  let remitente = api.create_remitente(&CreateRemitenteDto { identificacion: 1020304050,
                                                             tipo: 1,
                                                             nombre: Some("ANA".into()),
                                                             primer_apellido: Some("GOMEZ".into()),
                                                             segundo_apellido: None,
                                                             nombre_entidad: None,
                                                             email: "ana@example.com".into(),
                                                             telefono: 3001234567,
                                                             creado_desde: "web".into() })
                     .await
                     .unwrap();
  api.create_iniciativa(1,
                        &CreateIniciativaDto { entidad: 1,
                                               radicado_por: remitente.id,
                                               tipo_proyecto: json!(1),
                                               titulo: "Comedores comunitarios".into(),
                                               descripcion: "Red de comedores".into(),
                                               poblacion_beneficiada: json!(1),
                                               valor_total: 5_000_000.0,
                                               creado_desde: "persona".into(),
                                               radicado: None,
                                               ubicaciones: vec![] })
     .await
     .unwrap();
  api
}

#[tokio::test]
async fn blank_input_is_rejected_without_calling_the_backend() {
  let api = InMemoryIniciativasApi::new();
  let err = query::find_iniciativa(&api, 1, "   ").await.unwrap_err();
  assert_eq!(lookup_message(&err), MSG_EMPTY_RADICADO);
  assert_eq!(api.calls(ApiOperation::FindIniciativa), 0);
}

#[tokio::test]
async fn unknown_radicado_is_not_found() {
  let api = api_with_one_initiative().await;
  let err = query::find_iniciativa(&*api, 1, "999").await.unwrap_err();
  assert!(matches!(err, WizardError::NotFound(_)));
  assert_eq!(lookup_message(&err), MSG_NOT_FOUND);

  api.fail_next_with_status(ApiOperation::FindIniciativa, 404, "Not found");
  let err = query::find_iniciativa(&*api, 1, &FIRST_STUB_RADICADO.to_string()).await.unwrap_err();
  assert_eq!(lookup_message(&err), MSG_NOT_FOUND);
}

#[tokio::test]
async fn backend_failure_yields_generic_retry_message() {
  let api = api_with_one_initiative().await;
  api.fail_next(ApiOperation::FindIniciativa, "boom");
  let err = query::find_iniciativa(&*api, 1, "202501000123").await.unwrap_err();
  assert_eq!(lookup_message(&err), MSG_LOOKUP_FAILED);
  assert_eq!(err.user_message(), MSG_LOOKUP_FAILED);
}

#[tokio::test]
async fn found_initiative_is_summarised() {
  let api = api_with_one_initiative().await;
  let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
  let ctl = WizardController::open(api.clone(), storage, WizardConfig::default());
  let ini = ctl.lookup(" 202501000123 ").await.unwrap();
  assert_eq!(ini.radicado, Some(FIRST_STUB_RADICADO));

  let lines = summary_lines(&ini);
  let value = |label: &str| lines.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone()).unwrap();
  assert_eq!(value("Radicado"), "202501000123");
  assert_eq!(value("Valor total"), "$ 5.000.000");
  assert_eq!(value("Fecha de radicación"), "No especificada");
}

#[tokio::test]
async fn step_options_load_both_catalogs() {
  let api = Arc::new(InMemoryIniciativasApi::new());
  let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
  let ctl = WizardController::open(api.clone(), storage, WizardConfig::default());
  let options = ctl.step_options().await.unwrap();
  assert_eq!(options.tipos_proyecto.len(), 2);
  assert_eq!(options.poblaciones.len(), 2);

  api.fail_next(ApiOperation::PoblacionesObjetivo, "caído");
  assert!(ctl.step_options().await.is_err());
}

#[tokio::test]
async fn found_initiative_lists_its_attached_documents() {
  let api = api_with_one_initiative().await;
  let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
  let ctl = WizardController::open(api.clone(), storage, WizardConfig::default());
  let ini = ctl.lookup("202501000123").await.unwrap();
  assert_eq!(document_lines(&ctl.lookup_documents(ini.id).await.unwrap()), vec![MSG_NO_DOCUMENTS.to_string()]);

  api.upload_documento(ini.id,
                       DocumentUpload { tipo_documento: "cartaPresentacion".into(),
                                        nombre_archivo: "carta.pdf".into(),
                                        mime: "application/pdf".into(),
                                        contenido: vec![1, 2, 3] })
     .await
     .unwrap();
  let docs = ctl.lookup_documents(ini.id).await.unwrap();
  assert_eq!(document_lines(&docs), vec!["cartaPresentacion: carta.pdf".to_string()]);
  assert_eq!(api.calls(ApiOperation::ListDocumentos), 2);
}

#[tokio::test]
async fn document_listing_failure_has_its_own_message() {
  let api = api_with_one_initiative().await;
  let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
  let ctl = WizardController::open(api.clone(), storage, WizardConfig::default());
  let ini = ctl.lookup("202501000123").await.unwrap();

  api.fail_next(ApiOperation::ListDocumentos, "boom");
  let err = ctl.lookup_documents(ini.id).await.unwrap_err();
  assert_eq!(err.user_message(), MSG_DOCUMENTS_FAILED);
  // el resumen sigue disponible
  assert!(ctl.lookup("202501000123").await.is_ok());
}
