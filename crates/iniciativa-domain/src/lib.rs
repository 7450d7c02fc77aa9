mod branches;
mod documents;
mod errors;
mod form;
pub mod format;
pub mod normalize;
pub mod rules;
mod submitter_kind;
pub mod validation;

pub use branches::{EntidadData, InitiativeFields, OrganizacionData, PersonaData, SubmissionRefs, SubmitterData};
pub use documents::{default_document_slots, slots_from_manifest, DocumentMetadata, DocumentSlot, ALLOWED_MIME_TYPES,
                    MAX_DOCUMENT_BYTES, MSG_FILE_TOO_LARGE, MSG_FILE_TYPE};
pub use errors::DomainError;
pub use form::{BranchPatch, FormPatch, FormState};
pub use rules::{field_rules, rule_for_field, rules_for, validate_step, FieldRule};
pub use submitter_kind::SubmitterKind;
pub use validation::{validate, ValidationResult, ValidationRules, ValidationState};
// Tipos del backend que aparecen en la API pública del dominio
pub use iniciativas_api::Ubicacion;
