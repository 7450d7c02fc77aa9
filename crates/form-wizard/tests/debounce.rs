use form_storage::{FormStorage, InMemoryKeyValueStore};
use form_wizard::{Debouncer, FormSession, WizardConfig, WizardController};
use iniciativa_domain::{FormState, SubmitterKind};
use iniciativas_api::InMemoryIniciativasApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{advance, timeout, Instant};

#[tokio::test(start_paused = true)]
async fn bursts_of_input_produce_a_single_tick() {
  let mut d = Debouncer::new(Duration::from_millis(300));
  let start = Instant::now();
  d.schedule();
  advance(Duration::from_millis(100)).await;
  d.schedule();
  advance(Duration::from_millis(100)).await;
  d.schedule();
  assert!(d.is_pending());

  assert!(d.ticked().await);
  assert!(start.elapsed() >= Duration::from_millis(500));
  assert!(!d.ticked().await);
  assert!(!d.try_tick());
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_pending_tick() {
  let mut d = Debouncer::new(Duration::from_millis(300));
  d.schedule();
  d.cancel();
  assert!(!d.is_pending());
  assert!(!timeout(Duration::from_secs(1), d.ticked()).await.unwrap());
  assert!(!d.try_tick());
}

#[tokio::test(start_paused = true)]
async fn waiting_without_a_schedule_returns_at_once() {
  let mut d = Debouncer::new(Duration::from_millis(300));
  let start = Instant::now();
  assert!(!timeout(Duration::from_secs(1), d.ticked()).await.unwrap());
  assert_eq!(start.elapsed(), Duration::ZERO);
}

#[test]
fn schedule_outside_a_runtime_ticks_immediately() {
  let mut d = Debouncer::new(Duration::from_millis(300));
  d.schedule();
  assert!(!d.is_pending());
  assert!(tokio_test::block_on(d.ticked()));
  assert!(!d.try_tick());
}

fn controller() -> WizardController {
  let storage = FormStorage::new(Arc::new(InMemoryKeyValueStore::new()));
  let session = FormSession::with_state(storage, FormState::new(SubmitterKind::Person));
  WizardController::with_session(Arc::new(InMemoryIniciativasApi::new()), session, WizardConfig::default())
}

#[tokio::test(start_paused = true)]
async fn input_gives_immediate_verdict_and_deferred_step_validation() {
  let mut ctl = controller();
  let verdict = ctl.input("email", "no-es-correo").unwrap();
  assert!(!verdict.is_valid);
  // el mapa del paso no se toca hasta que vence la espera
  assert!(ctl.session().validation().is_empty());
  assert_eq!(ctl.poll_validation(), None);

  assert!(!ctl.settle_validation().await);
  assert!(!ctl.session().validation().get("email").unwrap().is_valid);
  assert_eq!(ctl.state().persona.email, "no-es-correo");
}

#[tokio::test(start_paused = true)]
async fn poll_runs_validation_once_the_delay_elapsed() {
  let mut ctl = controller();
  ctl.input("nombres", "Ana").unwrap();
  tokio::time::sleep(Duration::from_millis(400)).await;
  assert_eq!(ctl.poll_validation(), Some(false));
  assert!(ctl.session().validation().get("nombres").unwrap().is_valid);
  assert_eq!(ctl.poll_validation(), None);
}

#[tokio::test(start_paused = true)]
async fn settling_with_nothing_scheduled_validates_without_waiting() {
  let mut ctl = controller();
  let settled = timeout(Duration::from_secs(1), ctl.settle_validation()).await;
  assert_eq!(settled.ok(), Some(false));
  assert!(!ctl.session().validation().is_empty());
}
