//! Asistente de radicación de iniciativas: sesión del formulario,
//! navegación por pasos y efectos remotos de cada paso.
pub mod binding;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod query;
pub mod session;
pub mod steps;

pub use binding::{step_fields, FieldBinding};
pub use config::WizardConfig;
pub use debounce::Debouncer;
pub use engine::{BusyFlag, InFlightGuard, StepOutcome, UploadOutcome, WizardController};
pub use errors::WizardError;
pub use factory::{step_at, steps_for};
pub use session::{FormSession, PendingAttachment, SessionStatus};
pub use steps::{StepContext, WizardStep};
