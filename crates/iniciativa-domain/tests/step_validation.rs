use iniciativa_domain::{field_rules, rules_for, validate, validate_step, DocumentMetadata, FormPatch, FormState,
                        SubmitterKind};

fn person_step1() -> FormState {
  let mut s = FormState::new(SubmitterKind::Person);
  let p = FormPatch::default().with_field(SubmitterKind::Person, "numeroDocumento", "1020304050")
                              .with_field(SubmitterKind::Person, "nombres", "Ana")
                              .with_field(SubmitterKind::Person, "primerApellido", "Gomez")
                              .with_field(SubmitterKind::Person, "email", "ana@example.com")
                              .with_field(SubmitterKind::Person, "numeroContacto", "3001234567");
  s.apply(&p).unwrap();
  s
}

fn initiative_patch(kind: SubmitterKind) -> FormPatch {
  FormPatch::default().with_field(kind, "tipoProyecto", "SOCIAL")
                      .with_field(kind, "titulo", "Comedores comunitarios")
                      .with_field(kind, "descripcion", "Red de comedores en barrios periféricos")
                      .with_field(kind, "poblacionBeneficiada", "1")
                      .with_field(kind, "valorTotal", "5000000")
}

#[test]
fn step_is_valid_iff_every_rule_passes() {
  let filled = person_step1();
  let map = validate_step(&filled);
  assert!(map.is_valid());
  assert_eq!(map.len(), field_rules(SubmitterKind::Person, 1).len());

  // vaciar cada campo, uno a la vez, invalida el paso y sólo ese campo
  for rule in field_rules(SubmitterKind::Person, 1) {
    let mut s = filled.clone();
    s.apply(&FormPatch::field(SubmitterKind::Person, &rule.name, "")).unwrap();
    let map = validate_step(&s);
    assert!(!map.is_valid(), "{} vacío debería invalidar el paso", rule.name);
    let bad: Vec<_> = map.errors().map(|(k, _)| k.to_string()).collect();
    assert_eq!(bad, vec![rule.name.clone()]);
  }
}

#[test]
fn validation_matches_rule_table_for_every_kind_and_step() {
  for kind in SubmitterKind::ALL {
    for step in 1..=kind.max_steps() {
      let mut s = FormState::new(kind);
      s.step = step;
      let map = validate_step(&s);
      let expected = rules_for(&s).iter().all(|r| validate(s.active_branch().field(&r.name), &r.rules).is_valid);
      assert_eq!(map.is_valid(), expected, "{} paso {}", kind, step);
      // formulario vacío: ningún paso es válido
      assert!(!map.is_valid());
    }
  }
}

#[test]
fn validation_is_idempotent() {
  let s = person_step1();
  assert_eq!(validate_step(&s), validate_step(&s));
}

#[test]
fn entity_short_nit_is_invalid() {
  let mut s = FormState::new(SubmitterKind::Entity);
  let p = FormPatch::default().with_field(SubmitterKind::Entity, "nombre", "Alcaldía de Tunja")
                              .with_field(SubmitterKind::Entity, "nit", "12")
                              .with_field(SubmitterKind::Entity, "email", "contacto@tunja.gov.co")
                              .with_field(SubmitterKind::Entity, "telefono", "6087405770");
  s.apply(&p).unwrap();
  let map = validate_step(&s);
  assert!(!map.is_valid());
  assert_eq!(map.get("nit").unwrap().message, "Formato inválido");

  s.apply(&FormPatch::field(SubmitterKind::Entity, "nit", "900123456-7")).unwrap();
  assert!(validate_step(&s).is_valid());
}

#[test]
fn initiative_step_bounds() {
  for kind in SubmitterKind::ALL {
    let mut s = FormState::new(kind);
    s.step = 2;
    s.apply(&initiative_patch(kind)).unwrap();
    assert!(validate_step(&s).is_valid(), "{}", kind);

    s.apply(&FormPatch::field(kind, "titulo", "Corto".repeat(21))).unwrap();
    assert_eq!(validate_step(&s).get("titulo").unwrap().message, "Máximo 100 caracteres");

    s.apply(&FormPatch::field(kind, "titulo", "Obra")).unwrap();
    assert_eq!(validate_step(&s).get("titulo").unwrap().message, "Mínimo 5 caracteres");

    s.apply(&FormPatch::field(kind, "titulo", "Obra pública").with_field(kind, "valorTotal", "12.5.3")).unwrap();
    assert_eq!(validate_step(&s).get("valorTotal").unwrap().message, "Formato inválido");

    s.apply(&FormPatch::field(kind, "valorTotal", "1500.75")).unwrap();
    assert!(validate_step(&s).is_valid());
  }
}

#[test]
fn document_step_tracks_upload_confirmation() {
  let mut s = person_step1();
  s.step = 3;
  assert!(!validate_step(&s).is_valid());

  for key in ["cartaPresentacion", "anexoTecnico", "mgaNacional"] {
    s.persona.attach_document(key, DocumentMetadata::new(format!("{}.pdf", key), "application/pdf", 2048)).unwrap();
  }
  // adjuntos pero sin subir
  assert!(!validate_step(&s).is_valid());

  for (i, key) in ["cartaPresentacion", "anexoTecnico", "mgaNacional"].iter().enumerate() {
    s.persona.mark_uploaded(key, Some(i as i64 + 1)).unwrap();
  }
  let map = validate_step(&s);
  assert!(map.is_valid());
  assert_eq!(map.len(), 3);
}
