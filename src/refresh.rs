use std::{
  future::Future,
  sync::atomic::{AtomicU64, Ordering},
  time::Duration,
};

use parking_lot::RwLock;
use tokio::{sync::watch, task::JoinHandle};

/// Proof that an evaluation was started, see [`Refresher::begin`].
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Latest result of a repeatedly re-run evaluation.
///
/// Every run takes a ticket before it starts; only the run holding the newest
/// ticket may publish, so a slow run finishing after a newer one started is
/// dropped instead of overwriting it.
pub struct Refresher<T> {
  generation: AtomicU64,
  latest: RwLock<Option<T>>,
}

impl<T: Clone> Refresher<T> {
  pub fn new() -> Self {
    Refresher {
      generation: AtomicU64::new(0),
      latest: RwLock::new(None),
    }
  }

  pub fn begin(&self) -> Ticket {
    Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
  }

  /// Returns `false` when the value was discarded as superseded.
  pub fn publish(&self, ticket: Ticket, value: T) -> bool {
    let mut latest = self.latest.write();

    if self.generation.load(Ordering::SeqCst) != ticket.0 {
      return false;
    }

    *latest = Some(value);
    true
  }

  pub fn latest(&self) -> Option<T> {
    self.latest.read().clone()
  }
}

impl<T: Clone> Default for Refresher<T> {
  fn default() -> Self {
    Self::new()
  }
}

pub struct RefreshHandle {
  cancel: watch::Sender<bool>,
  task: JoinHandle<()>,
}

impl RefreshHandle {
  pub fn cancel(&self) {
    let _ = self.cancel.send(true);
  }

  pub fn is_finished(&self) -> bool {
    self.task.is_finished()
  }

  /// Waits for the task to stop. Never returns unless cancelled.
  pub async fn join(self) {
    let RefreshHandle { cancel, task } = self;

    if let Err(err) = task.await {
      tracing::error!(error = %err, "Refresh task aborted");
    }

    drop(cancel);
  }

  /// Drives `work` to completion, then stops the task and returns the
  /// output of `work`.
  pub async fn stop_after<W: Future>(self, work: W) -> W::Output {
    let out = work.await;

    self.cancel();
    self.join().await;

    out
  }
}

/// Runs `job` every `period`, the first run immediately, until the handle is
/// cancelled or dropped.
pub fn spawn_periodic<F, Fut>(period: Duration, mut job: F) -> RefreshHandle
where
  F: FnMut() -> Fut + Send + 'static,
  Fut: Future<Output = ()> + Send + 'static,
{
  let (cancel, mut cancelled) = watch::channel(false);

  let task = tokio::spawn(async move {
    let mut interval = tokio::time::interval(period);

    loop {
      tokio::select! {
        _ = interval.tick() => job().await,
        res = cancelled.changed() => {
          if res.is_err() || *cancelled.borrow() {
            break;
          }
        },
      }
    }

    tracing::info!("Refresh stopped");
  });

  RefreshHandle { cancel, task }
}
