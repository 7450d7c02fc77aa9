use iniciativa_domain::normalize::{identificacion, iniciativa_payload, remitente_payload, remitente_update_payload,
                                   ORIGEN_WEB};
use iniciativa_domain::{DomainError, FormPatch, FormState, SubmitterKind};
use serde_json::json;

#[test]
fn person_payload_uppercases_names_and_lowercases_email() {
  let mut s = FormState::new(SubmitterKind::Person);
  s.apply(&FormPatch::default().with_field(SubmitterKind::Person, "numeroDocumento", "1020304050")
                               .with_field(SubmitterKind::Person, "nombres", "Ana María")
                               .with_field(SubmitterKind::Person, "primerApellido", "Gómez")
                               .with_field(SubmitterKind::Person, "email", "Ana@Example.COM")
                               .with_field(SubmitterKind::Person, "numeroContacto", "3001234567"))
   .unwrap();
  let dto = remitente_payload(&s, ORIGEN_WEB).unwrap();
  assert_eq!(dto.identificacion, 1020304050);
  assert_eq!(dto.tipo, 1);
  assert_eq!(dto.nombre.as_deref(), Some("ANA MARÍA"));
  assert_eq!(dto.primer_apellido.as_deref(), Some("GÓMEZ"));
  assert_eq!(dto.segundo_apellido, None);
  assert_eq!(dto.nombre_entidad, None);
  assert_eq!(dto.email, "ana@example.com");
  assert_eq!(dto.telefono, 3001234567);
  assert_eq!(dto.creado_desde, "web");
}

#[test]
fn entity_payload_strips_nit_separators() {
  let mut s = FormState::new(SubmitterKind::Entity);
  s.apply(&FormPatch::default().with_field(SubmitterKind::Entity, "nombre", "Alcaldía de Tunja")
                               .with_field(SubmitterKind::Entity, "nit", "891800846-1")
                               .with_field(SubmitterKind::Entity, "email", "CONTACTO@TUNJA.GOV.CO"))
   .unwrap();
  let dto = remitente_payload(&s, ORIGEN_WEB).unwrap();
  assert_eq!(dto.identificacion, 8918008461);
  assert_eq!(dto.tipo, 2);
  assert_eq!(dto.nombre_entidad.as_deref(), Some("ALCALDÍA DE TUNJA"));
  assert_eq!(dto.nombre, None);
  assert_eq!(dto.telefono, 0);

  let upd = remitente_update_payload(&s);
  assert_eq!(upd.email, "contacto@tunja.gov.co");
  assert_eq!(upd.telefono, 0);
}

#[test]
fn organization_uses_razon_as_identification() {
  let mut s = FormState::new(SubmitterKind::Organization);
  s.apply(&FormPatch::default().with_field(SubmitterKind::Organization, "nombreOrganizacion", "Fundación Semillas")
                               .with_field(SubmitterKind::Organization, "razonOrganizacion", "900.555.111-2"))
   .unwrap();
  assert_eq!(identificacion(&s).unwrap(), 9005551112);
  assert_eq!(remitente_payload(&s, "web").unwrap().tipo, 3);
}

#[test]
fn non_numeric_document_is_rejected() {
  let mut s = FormState::new(SubmitterKind::Person);
  s.apply(&FormPatch::field(SubmitterKind::Person, "numeroDocumento", "AB12")).unwrap();
  let err = remitente_payload(&s, ORIGEN_WEB).unwrap_err();
  assert_eq!(err, DomainError::ValidationError("El número de documento debe ser numérico".into()));
}

#[test]
fn initiative_payload_requires_submitter_and_parses_values() {
  let mut s = FormState::new(SubmitterKind::Person);
  s.apply(&FormPatch::default().with_field(SubmitterKind::Person, "tipoProyecto", "SOCIAL")
                               .with_field(SubmitterKind::Person, "titulo", " Comedores comunitarios ")
                               .with_field(SubmitterKind::Person, "descripcion", "Red de comedores")
                               .with_field(SubmitterKind::Person, "poblacionBeneficiada", "1")
                               .with_field(SubmitterKind::Person, "valorTotal", "5000000"))
   .unwrap();
  assert!(matches!(iniciativa_payload(&s, 1), Err(DomainError::ValidationError(_))));

  s.persona.refs.remitente_id = Some(17);
  let dto = iniciativa_payload(&s, 1).unwrap();
  let body = serde_json::to_value(&dto).unwrap();
  assert_eq!(body["entidad"], json!(1));
  assert_eq!(body["radicado_por"], json!(17));
  assert_eq!(body["tipo_proyecto"], json!("SOCIAL"));
  assert_eq!(body["poblacion_beneficiada"], json!(1));
  assert_eq!(body["valor_total"], json!(5000000.0));
  assert_eq!(body["titulo"], json!("Comedores comunitarios"));
  assert_eq!(body["creado_desde"], json!("persona"));
  assert!(body["radicado"].is_null());
  assert!(body.get("ubicaciones").is_none());
}
