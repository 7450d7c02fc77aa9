use form_persistence::DieselKeyValueStore;
use form_storage::{keys, FormStorage, KeyValueStore};
use iniciativa_domain::{FormPatch, FormState, SubmitterKind};
use std::sync::Arc;
use uuid::Uuid;

fn setup_store() -> DieselKeyValueStore {
    // Cada prueba usa su propia base en memoria compartida
    let url = format!("file:formdb_{}?mode=memory&cache=shared", Uuid::new_v4().simple());
    DieselKeyValueStore::new(&url).expect("store")
}

#[test]
fn set_get_remove_roundtrip() {
    let store = setup_store();
    assert!(store.get("k").unwrap().is_none());
    store.set("k", "\"uno\"").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("\"uno\""));
    // reemplazo
    store.set("k", "\"dos\"").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("\"dos\""));
    assert!(store.contains("k").unwrap());
    store.remove("k").unwrap();
    assert!(store.get("k").unwrap().is_none());
    // borrar dos veces no es error
    store.remove("k").unwrap();
}

#[test]
fn form_storage_over_sqlite_recovers_after_losing_full_record() {
    let store = Arc::new(setup_store());
    let storage = FormStorage::new(store.clone());

    let mut s = FormState::new(SubmitterKind::Organization);
    s.apply(&FormPatch::field(SubmitterKind::Organization, "nombreOrganizacion", "Fundación Semillas")).unwrap();
    s.organizacion.refs.remitente_id = Some(8);
    s.organizacion.refs.radicado = Some(202501000200);
    storage.save(&s);
    assert_eq!(storage.load(), Some(s));

    store.remove(keys::FORM_DATA).unwrap();
    let recovered = storage.load().unwrap();
    assert_eq!(recovered.submitter_kind, SubmitterKind::Organization);
    assert_eq!(recovered.organizacion.refs.remitente_id, Some(8));
    assert_eq!(recovered.organizacion.refs.radicado, Some(202501000200));
}

#[test]
fn stores_sharing_a_url_see_the_same_rows() {
    let url = format!("file:formdb_{}?mode=memory&cache=shared", Uuid::new_v4().simple());
    let a = DieselKeyValueStore::new(&url).unwrap();
    let b = DieselKeyValueStore::new(&url).unwrap();
    a.set(keys::TIPO_REMITENTE, "\"entidad\"").unwrap();
    assert_eq!(b.get(keys::TIPO_REMITENTE).unwrap().as_deref(), Some("\"entidad\""));
}
