use iniciativas_api::{ApiError, CreateIniciativaDto, CreateRemitenteDto, DocumentUpload, HttpIniciativasApi,
                      IniciativasApi, UpdateRemitenteDto, GENERIC_ERROR_MESSAGE};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HttpIniciativasApi {
  HttpIniciativasApi::new(format!("{}/mie/api", server.uri()), Duration::from_secs(5)).unwrap()
}

fn remitente_dto() -> CreateRemitenteDto {
  CreateRemitenteDto { identificacion: 1020304050,
                       tipo: 1,
                       nombre: Some("ANA".into()),
                       primer_apellido: Some("GOMEZ".into()),
                       segundo_apellido: None,
                       nombre_entidad: None,
                       email: "ana@example.com".into(),
                       telefono: 3001234567,
                       creado_desde: "web".into() }
}

#[tokio::test]
async fn create_remitente_posts_body_and_reads_wrapped_id() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).and(path("/mie/api/remitente/"))
                             .and(body_partial_json(json!({"identificacion": 1020304050, "tipo": 1, "creado_desde": "web"})))
                             .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "17", "email": "ana@example.com"}})))
                             .expect(1)
                             .mount(&server)
                             .await;

  let api = client_for(&server).await;
  let r = api.create_remitente(&remitente_dto()).await.unwrap();
  assert_eq!(r.id, 17);
  assert_eq!(r.email.as_deref(), Some("ana@example.com"));
}

#[tokio::test]
async fn update_remitente_sends_only_email_and_phone() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).and(path("/mie/api/remitente/17"))
                             .and(body_partial_json(json!({"email": "nuevo@example.com", "telefono": 3009998888i64})))
                             .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 17, "telefono": "3009998888"})))
                             .expect(1)
                             .mount(&server)
                             .await;

  let api = client_for(&server).await;
  let dto = UpdateRemitenteDto { email: "nuevo@example.com".into(), telefono: 3009998888 };
  let r = api.update_remitente(17, &dto).await.unwrap();
  assert_eq!(r.telefono, Some(3009998888));
}

#[tokio::test]
async fn find_remitente_maps_404_to_none() {
  let server = MockServer::start().await;
  Mock::given(method("GET")).and(path("/mie/api/remitente/999"))
                            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No encontrado."})))
                            .mount(&server)
                            .await;

  let api = client_for(&server).await;
  assert!(api.find_remitente("999").await.unwrap().is_none());
}

#[tokio::test]
async fn create_iniciativa_sends_null_radicado_and_returns_it() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).and(path("/mie/api/iniciativas/1/"))
                             .and(body_partial_json(json!({"radicado": null, "radicado_por": 17, "creado_desde": "persona"})))
                             .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5, "radicado": 202501000123i64})))
                             .expect(1)
                             .mount(&server)
                             .await;

  let api = client_for(&server).await;
  let dto = CreateIniciativaDto { entidad: 1,
                                  radicado_por: 17,
                                  tipo_proyecto: json!("SOCIAL"),
                                  titulo: "Comedores comunitarios".into(),
                                  descripcion: "Red de comedores en barrios".into(),
                                  poblacion_beneficiada: json!(1),
                                  valor_total: 5_000_000.0,
                                  creado_desde: "persona".into(),
                                  radicado: None,
                                  ubicaciones: vec![] };
  let ini = api.create_iniciativa(1, &dto).await.unwrap();
  assert_eq!(ini.id, 5);
  assert_eq!(ini.radicado, Some(202501000123));
}

#[tokio::test]
async fn server_message_is_surfaced_on_failure() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).and(path("/mie/api/remitente/"))
                             .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "El correo ya está registrado"})))
                             .mount(&server)
                             .await;

  let api = client_for(&server).await;
  let err = api.create_remitente(&remitente_dto()).await.unwrap_err();
  match &err {
    ApiError::Status { status, .. } => assert_eq!(*status, 400),
    other => panic!("se esperaba Status, llegó {:?}", other),
  }
  assert_eq!(err.user_message(), "El correo ya está registrado");
}

#[tokio::test]
async fn unreadable_error_body_falls_back_to_generic_message() {
  let server = MockServer::start().await;
  Mock::given(method("GET")).and(path("/mie/api/tipo-proyecto/1"))
                            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
                            .mount(&server)
                            .await;

  let api = client_for(&server).await;
  let err = api.tipos_proyecto(1).await.unwrap_err();
  assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn option_lists_accept_data_envelope() {
  let server = MockServer::start().await;
  Mock::given(method("GET")).and(path("/mie/api/poblacion-objetivo/1"))
                            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                              {"id": 1, "poblacion_objetivo": "Primera infancia"},
                              {"id": "2", "poblacion_objetivo": "Adulto mayor"}
                            ]})))
                            .mount(&server)
                            .await;

  let api = client_for(&server).await;
  let list = api.poblaciones_objetivo(1).await.unwrap();
  assert_eq!(list.len(), 2);
  assert_eq!(list[1].id, 2);
}

#[tokio::test]
async fn manifest_and_lookup_paths_use_trailing_slash() {
  let server = MockServer::start().await;
  Mock::given(method("GET")).and(path("/mie/api/documentos-proyecto/1/3/"))
                            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                              {"id": 9, "secuencia": 1, "nombre_archivo": "cartaPresentacion", "obligatorio": true}
                            ])))
                            .mount(&server)
                            .await;
  Mock::given(method("GET")).and(path("/mie/api/iniciativas/1/202501000123/"))
                            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                              "id": 5, "radicado": "202501000123", "titulo": "Comedores", "valor_total": "5000000.00"
                            })))
                            .mount(&server)
                            .await;

  let api = client_for(&server).await;
  let manifest = api.documentos_requeridos(1, 3).await.unwrap();
  assert_eq!(manifest[0].nombre_archivo, "cartaPresentacion");
  assert!(manifest[0].obligatorio);

  let ini = api.find_iniciativa(1, "202501000123").await.unwrap().unwrap();
  assert_eq!(ini.radicado, Some(202501000123));
  assert_eq!(ini.valor_total, Some(5_000_000.0));
}

#[tokio::test]
async fn upload_documento_posts_multipart() {
  let server = MockServer::start().await;
  Mock::given(method("POST")).and(path("/mie/api/iniciativas/5/documentos/"))
                             .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                               "id": 31, "tipo_documento": "cartaPresentacion", "nombre": "carta.pdf"
                             })))
                             .expect(1)
                             .mount(&server)
                             .await;

  let api = client_for(&server).await;
  let upload = DocumentUpload { tipo_documento: "cartaPresentacion".into(),
                                nombre_archivo: "carta.pdf".into(),
                                mime: "application/pdf".into(),
                                contenido: b"%PDF-1.4".to_vec() };
  let doc = api.upload_documento(5, upload).await.unwrap();
  assert_eq!(doc.id, Some(31));

  let received = server.received_requests().await.unwrap();
  let content_type = received[0].headers.get("content-type").unwrap().to_str().unwrap().to_string();
  assert!(content_type.starts_with("multipart/form-data"));
  let body = String::from_utf8_lossy(&received[0].body);
  assert!(body.contains("name=\"archivo\""));
  assert!(body.contains("name=\"tipo_documento\""));
}
