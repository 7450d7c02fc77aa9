//! Controlador del asistente: navegación entre pasos, efectos remotos y
//! envío final.

use crate::binding::FieldBinding;
use crate::config::WizardConfig;
use crate::debounce::Debouncer;
use crate::errors::WizardError;
use crate::factory::step_at;
use crate::query::{self, StepOptions};
use crate::session::{FormSession, PendingAttachment, SessionStatus};
use crate::steps::{upload_one, StepContext};
use form_storage::{FormStorage, SubmissionReceipt};
use iniciativa_domain::{DocumentMetadata, FormState, ValidationResult};
use iniciativas_api::{ApiError, DocumentoCargado, Iniciativa, IniciativasApi};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Resultado de `next`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
  /// Avanzó al paso indicado.
  Advanced(u8),
  /// El paso actual no es válido; no hubo llamadas remotas.
  Invalid,
  /// La iniciativa quedó radicada.
  Submitted(SubmissionReceipt),
}

/// Resultado de adjuntar un documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
  Uploaded,
  /// Aún no hay iniciativa; se subirá al enviar.
  Pending,
}

/// Bandera de "operación en curso" compartible con la interfaz.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
  pub fn is_busy(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }

  /// Toma la bandera; `Busy` si ya estaba tomada.
  pub fn try_acquire(&self) -> Result<InFlightGuard, WizardError> {
    self.0
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .map_err(|_| WizardError::Busy)?;
    Ok(InFlightGuard(self.0.clone()))
  }
}

/// Libera la bandera al salir de alcance, también ante error.
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
  fn drop(&mut self) {
    self.0.store(false, Ordering::SeqCst);
  }
}

pub struct WizardController {
  session: FormSession,
  api: Arc<dyn IniciativasApi>,
  config: WizardConfig,
  busy: BusyFlag,
  debouncer: Debouncer,
}

impl WizardController {
  /// Abre el asistente restaurando el formulario guardado, si lo hay.
  pub fn open(api: Arc<dyn IniciativasApi>, storage: FormStorage, config: WizardConfig) -> Self {
    Self::with_session(api, FormSession::open(storage), config)
  }

  pub fn with_session(api: Arc<dyn IniciativasApi>, session: FormSession, config: WizardConfig) -> Self {
    let debouncer = Debouncer::new(config.validation_debounce);
    Self { session, api, config, busy: BusyFlag::default(), debouncer }
  }

  pub fn session(&self) -> &FormSession {
    &self.session
  }

  pub fn session_mut(&mut self) -> &mut FormSession {
    &mut self.session
  }

  pub fn state(&self) -> &FormState {
    self.session.state()
  }

  pub fn config(&self) -> &WizardConfig {
    &self.config
  }

  pub fn busy_flag(&self) -> BusyFlag {
    self.busy.clone()
  }

  pub fn status(&self) -> SessionStatus {
    self.session.status(self.busy.is_busy())
  }

  /// Escribe un campo del paso actual, devuelve su veredicto inmediato y
  /// programa la revalidación del paso.
  pub fn input(&mut self, field: &str, value: &str) -> Result<ValidationResult, WizardError> {
    let binding = FieldBinding::for_field(self.session.state(), field);
    let verdict = binding.write(&mut self.session, value)?;
    self.debouncer.schedule();
    Ok(verdict)
  }

  /// Espera a que venza la revalidación programada y la ejecuta.
  pub async fn settle_validation(&mut self) -> bool {
    self.debouncer.ticked().await;
    self.session.validate_current_step()
  }

  /// Ejecuta la revalidación si ya venció; `None` si sigue pendiente.
  pub fn poll_validation(&mut self) -> Option<bool> {
    if self.debouncer.try_tick() {
      Some(self.session.validate_current_step())
    } else {
      None
    }
  }

  /// Avanza un paso. Sólo hay efecto remoto si el paso es válido; en el
  /// último paso delega en `submit`.
  pub async fn next(&mut self) -> Result<StepOutcome, WizardError> {
    let _guard = self.busy.try_acquire()?;
    self.ensure_open()?;
    if self.session.state().is_last_step() {
      return self.submit_locked().await;
    }
    self.session.clear_messages();
    self.debouncer.cancel();
    if !self.current_step_ready()? {
      return Ok(StepOutcome::Invalid);
    }
    let state = self.run_current_step().await?;
    let step = state.step + 1;
    self.session.commit_state(state);
    self.session.set_step(step);
    self.session.validate_current_step();
    debug!("sesión {}: paso {}", self.session.id(), step);
    Ok(StepOutcome::Advanced(step))
  }

  /// Retrocede un paso, sin llamadas remotas.
  pub fn prev(&mut self) -> Result<u8, WizardError> {
    if self.busy.is_busy() {
      return Err(WizardError::Busy);
    }
    self.ensure_open()?;
    let step = self.session.state().step;
    if step <= 1 {
      return Err(WizardError::InvalidTransition("Ya se encuentra en el primer paso".into()));
    }
    self.debouncer.cancel();
    self.session.clear_messages();
    self.session.set_step(step - 1);
    self.session.validate_current_step();
    Ok(step - 1)
  }

  /// Envío final. Sólo desde el último paso.
  pub async fn submit(&mut self) -> Result<StepOutcome, WizardError> {
    let _guard = self.busy.try_acquire()?;
    self.ensure_open()?;
    if !self.session.state().is_last_step() {
      return Err(WizardError::InvalidTransition("Complete todos los pasos antes de enviar".into()));
    }
    self.submit_locked().await
  }

  async fn submit_locked(&mut self) -> Result<StepOutcome, WizardError> {
    self.session.clear_messages();
    self.debouncer.cancel();
    if !self.current_step_ready()? {
      return Ok(StepOutcome::Invalid);
    }
    let state = self.run_current_step().await?;
    let receipt = match SubmissionReceipt::from_state(&state) {
      Some(r) => r,
      None => {
        let err = WizardError::Api(ApiError::UnexpectedResponse("la iniciativa no tiene radicado".into()));
        self.session.set_error(err.user_message());
        return Err(err);
      }
    };
    self.session.commit_state(state);
    self.session.drop_uploaded_attachments();
    self.session.validate_current_step();
    self.session.set_success(format!("Iniciativa radicada con el número {}", receipt.radicado));
    self.session.mark_submitted(receipt.clone());
    info!("sesión {}: iniciativa radicada {}", self.session.id(), receipt.radicado);
    Ok(StepOutcome::Submitted(receipt))
  }

  fn current_step_ready(&mut self) -> Result<bool, WizardError> {
    let state = self.session.state();
    let step = step_at(state.submitter_kind, state.step)
      .ok_or_else(|| WizardError::InvalidTransition(format!("Paso {} inexistente", state.step)))?;
    let ready = step.is_ready(state, self.session.attachments());
    self.session.validate_current_step();
    Ok(ready)
  }

  /// Ejecuta el efecto remoto del paso actual sobre una copia del estado.
  /// Ante error la sesión sólo cambia su mensaje de error.
  async fn run_current_step(&mut self) -> Result<FormState, WizardError> {
    let state = self.session.state().clone();
    let step = step_at(state.submitter_kind, state.step)
      .ok_or_else(|| WizardError::InvalidTransition(format!("Paso {} inexistente", state.step)))?;
    let result = {
      let ctx = StepContext { api: self.api.as_ref(), config: &self.config, attachments: self.session.attachments() };
      step.commit(&ctx, state).await
    };
    result.map_err(|e| {
            warn!("sesión {}: paso {} fallido: {}", self.session.id(), step.name(), e);
            self.session.set_error(e.user_message());
            e
          })
  }

  fn ensure_open(&self) -> Result<(), WizardError> {
    if self.session.is_submitted() {
      return Err(WizardError::InvalidTransition("La iniciativa ya fue radicada".into()));
    }
    Ok(())
  }

  /// Adjunta un archivo a una casilla. Si la iniciativa ya existe lo sube
  /// de inmediato; si no, queda pendiente para el envío.
  pub async fn upload_document(&mut self, key: &str, metadata: DocumentMetadata, contenido: Vec<u8>)
                               -> Result<UploadOutcome, WizardError> {
    let _guard = self.busy.try_acquire()?;
    self.ensure_open()?;
    if let Err(message) = metadata.check() {
      self.session.set_error(message.clone());
      return Err(WizardError::Validation(message));
    }
    self.session.clear_messages();
    let attachment = PendingAttachment { metadata, contenido };
    self.session.attach(key, attachment.clone())?;
    if self.session.state().persona.refs.iniciativa_id.is_none() {
      return Ok(UploadOutcome::Pending);
    }
    let mut persona = self.session.state().persona.clone();
    if let Err(e) = upload_one(self.api.as_ref(), &mut persona, key, &attachment).await {
      warn!("sesión {}: carga de {} fallida: {}", self.session.id(), key, e);
      self.session.set_error(e.user_message());
      return Err(e);
    }
    let mut state = self.session.state().clone();
    state.persona = persona;
    self.session.commit_state(state);
    self.session.drop_uploaded_attachments();
    self.session.validate_current_step();
    Ok(UploadOutcome::Uploaded)
  }

  /// Quita el archivo de una casilla (sólo local).
  pub fn remove_document(&mut self, key: &str) -> Result<(), WizardError> {
    if self.busy.is_busy() {
      return Err(WizardError::Busy);
    }
    self.ensure_open()?;
    self.session.detach(key)?;
    self.session.validate_current_step();
    Ok(())
  }

  /// Cierra el ciclo tras un envío: formulario nuevo, conservando el
  /// remitente si `submit_another`.
  pub fn finish(&mut self, submit_another: bool) -> Result<(), WizardError> {
    if self.busy.is_busy() {
      return Err(WizardError::Busy);
    }
    self.debouncer.cancel();
    if submit_another {
      self.session.reset_preserving_submitter();
    } else {
      self.session.reset_form();
    }
    Ok(())
  }

  /// Descarta el formulario en curso.
  pub fn reset(&mut self) -> Result<(), WizardError> {
    self.finish(false)
  }

  pub async fn step_options(&self) -> Result<StepOptions, WizardError> {
    query::step_options(self.api.as_ref(), self.config.entidad_id).await
  }

  pub async fn lookup(&self, radicado: &str) -> Result<Iniciativa, WizardError> {
    query::find_iniciativa(self.api.as_ref(), self.config.entidad_id, radicado).await
  }

  pub async fn lookup_documents(&self, iniciativa_id: i64) -> Result<Vec<DocumentoCargado>, WizardError> {
    query::documentos_adjuntos(self.api.as_ref(), iniciativa_id).await
  }
}
