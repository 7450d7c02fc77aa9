//! Revalidación diferida: cada entrada nueva cancela la pendiente y
//! programa otra tras `delay` de inactividad.

use log::trace;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Debouncer {
  delay: Duration,
  pending: Option<JoinHandle<()>>,
  tx: mpsc::UnboundedSender<()>,
  rx: mpsc::UnboundedReceiver<()>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self { delay, pending: None, tx, rx }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Programa un tick. Fuera de un runtime de tokio el tick es inmediato.
  pub fn schedule(&mut self) {
    self.cancel();
    let tx = self.tx.clone();
    match tokio::runtime::Handle::try_current() {
      Ok(handle) => {
        let delay = self.delay;
        self.pending = Some(handle.spawn(async move {
                                     tokio::time::sleep(delay).await;
                                     let _ = tx.send(());
                                   }));
      }
      Err(_) => {
        let _ = tx.send(());
      }
    }
  }

  /// Cancela el tick pendiente y descarta los ya entregados sin consumir.
  pub fn cancel(&mut self) {
    if let Some(handle) = self.pending.take() {
      handle.abort();
      trace!("validación diferida cancelada");
    }
    while self.rx.try_recv().is_ok() {}
  }

  pub fn is_pending(&self) -> bool {
    self.pending.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
  }

  /// Espera el tick programado. Devuelve `false` sin esperar cuando no hay
  /// nada programado ni entregado.
  pub async fn ticked(&mut self) -> bool {
    if self.try_tick() {
      return true;
    }
    if self.pending.is_none() {
      return false;
    }
    // `tx` vive en `self`; el canal no se cierra mientras exista
    let fired = self.rx.recv().await.is_some();
    self.pending = None;
    fired
  }

  /// Consume un tick ya entregado, sin esperar.
  pub fn try_tick(&mut self) -> bool {
    let fired = self.rx.try_recv().is_ok();
    if fired {
      self.pending = None;
    }
    fired
  }
}

impl Drop for Debouncer {
  fn drop(&mut self) {
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }
}
