//! Debounced background persistence of a year record.
//!
//! A `Syncer` owns a worker task. Every call to `schedule` hands the worker a fresh snapshot and
//! pushes the write deadline out to `now + debounce`. When the deadline passes without another
//! change, the latest snapshot is sent to the backend as a full replacement. A background write
//! that fails is logged and dropped; the next change will carry the full state again. Only the
//! explicit flush done by `finish` reports its failure to the caller.

use crate::api::Remote;
use crate::model::YearRecord;
use crate::Result;
use anyhow::{anyhow, Context};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// The quiet period used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// What the worker is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing is waiting to be written.
    Clean,
    /// A snapshot will be written at `deadline` unless another change arrives first.
    PendingWrite { deadline: Instant },
}

enum Msg {
    Changed {
        snapshot: Box<YearRecord>,
        deadline: Instant,
    },
    Flush(oneshot::Sender<Result<()>>),
}

/// Handle to the debounce worker. Dropping it, or calling `cancel`, discards any pending write.
pub struct Syncer {
    tx: mpsc::UnboundedSender<Msg>,
    state_tx: Arc<watch::Sender<SyncState>>,
    state: watch::Receiver<SyncState>,
    debounce: Duration,
    task: Option<JoinHandle<()>>,
}

impl Syncer {
    /// Starts the worker. Nothing is written until the first `schedule`.
    pub fn spawn(remote: Arc<dyn Remote>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(SyncState::Clean);
        let state_tx = Arc::new(state_tx);
        let task = tokio::spawn(run(remote, rx, state_tx.clone()));
        Self {
            tx,
            state_tx,
            state,
            debounce,
            task: Some(task),
        }
    }

    /// Replaces the pending snapshot with `snapshot` and restarts the quiet period. The state is
    /// `PendingWrite` as soon as this returns.
    pub fn schedule(&self, snapshot: YearRecord) {
        let deadline = Instant::now() + self.debounce;
        let msg = Msg::Changed {
            snapshot: Box::new(snapshot),
            deadline,
        };
        if self.tx.send(msg).is_err() {
            warn!("The sync worker has stopped, this change will not be saved");
            return;
        }
        self.state_tx
            .send_replace(SyncState::PendingWrite { deadline });
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition.
    pub fn watch(&self) -> watch::Receiver<SyncState> {
        self.state.clone()
    }

    /// Stops the worker without writing whatever is pending.
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Writes whatever is pending right away and waits for the worker to stop. Unlike a
    /// background write, a failure here is returned.
    pub async fn finish(mut self) -> Result<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self.tx.send(Msg::Flush(reply_tx)).is_ok();
        drop(self);
        let outcome = if sent {
            reply_rx
                .await
                .unwrap_or_else(|_| Err(anyhow!("The sync worker stopped before flushing")))
        } else {
            Err(anyhow!("The sync worker stopped before flushing"))
        };
        task.await
            .context("The sync worker did not shut down cleanly")?;
        outcome
    }
}

impl Drop for Syncer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    remote: Arc<dyn Remote>,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    state: Arc<watch::Sender<SyncState>>,
) {
    let mut pending: Option<(YearRecord, Instant)> = None;
    let timer = tokio::time::sleep(DEFAULT_DEBOUNCE);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Msg::Changed { snapshot, deadline }) => {
                    timer.as_mut().reset(deadline);
                    pending = Some((*snapshot, deadline));
                }
                Some(Msg::Flush(reply)) => {
                    let outcome = match pending.take() {
                        Some((snapshot, deadline)) => {
                            let outcome = write(remote.as_ref(), &snapshot).await;
                            settle(&state, deadline);
                            outcome
                        }
                        None => Ok(()),
                    };
                    // The caller may have given up waiting.
                    let _ = reply.send(outcome);
                }
                None => {
                    if pending.is_some() {
                        debug!("Discarding a pending write");
                    }
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some((snapshot, deadline)) = pending.take() {
                    if let Err(e) = write(remote.as_ref(), &snapshot).await {
                        warn!("{e:#}");
                    }
                    settle(&state, deadline);
                }
            }
        }
    }
}

/// Marks the state `Clean` unless a newer change has been scheduled since `deadline` was set.
fn settle(state: &watch::Sender<SyncState>, deadline: Instant) {
    state.send_if_modified(|current| {
        if *current == (SyncState::PendingWrite { deadline }) {
            *current = SyncState::Clean;
            true
        } else {
            false
        }
    });
}

async fn write(remote: &dyn Remote, snapshot: &YearRecord) -> Result<()> {
    remote
        .update(snapshot)
        .await
        .with_context(|| format!("Failed to save the {} tracker", snapshot.year()))?;
    info!("Saved the {} tracker", snapshot.year());
    Ok(())
}
