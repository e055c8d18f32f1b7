//! Background writer that mirrors cart snapshots to storage.
//!
//! A single task owns all writes for one storage key. Snapshots arrive over
//! an unbounded channel in mutation order; when several are queued, only the
//! newest is written. Storage therefore never ends on an older snapshot than
//! the last one handed over.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::cart::Cart;
use crate::error::CartError;
use crate::payload;
use crate::storage::KeyValueStorage;

/// Commands processed by the writer task.
enum WriterCmd {
    /// Persist this snapshot.
    Save(Cart),
    /// Reply once everything queued before this command is written.
    Flush(oneshot::Sender<()>),
    /// Write anything pending, reply, then stop.
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the writer task.
#[derive(Debug)]
pub(crate) struct Writer {
    tx: mpsc::UnboundedSender<WriterCmd>,
}

impl Writer {
    /// Spawn the writer on the current tokio runtime.
    pub(crate) fn spawn<S: KeyValueStorage>(
        storage: Arc<S>,
        key: String,
    ) -> Result<Self, CartError> {
        let handle = Handle::try_current().map_err(|_| CartError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(storage, key, rx));
        Ok(Self { tx })
    }

    /// Queue a snapshot. Never blocks.
    pub(crate) fn save(&self, cart: Cart) {
        if self.tx.send(WriterCmd::Save(cart)).is_err() {
            debug!("Writer stopped, snapshot not persisted");
        }
    }

    /// Wait until every snapshot queued so far has been written.
    pub(crate) async fn flush(&self) -> Result<(), CartError> {
        self.request(WriterCmd::Flush).await
    }

    /// Flush and stop the writer.
    pub(crate) async fn shutdown(&self) -> Result<(), CartError> {
        self.request(WriterCmd::Shutdown).await
    }

    async fn request(
        &self,
        cmd: impl FnOnce(oneshot::Sender<()>) -> WriterCmd,
    ) -> Result<(), CartError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(cmd(ack))
            .map_err(|_| CartError::WriterStopped)?;
        done.await.map_err(|_| CartError::WriterStopped)
    }
}

async fn run<S: KeyValueStorage>(
    storage: Arc<S>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriterCmd>,
) {
    debug!(key = %key, "Cart writer started");

    let mut pending: Option<Cart> = None;
    let mut waiters: Vec<oneshot::Sender<()>> = Vec::new();

    while let Some(cmd) = rx.recv().await {
        let mut stop = false;
        let mut next = Some(cmd);

        // Drain whatever is already queued so only the newest snapshot is written.
        while let Some(cmd) = next {
            match cmd {
                WriterCmd::Save(cart) => pending = Some(cart),
                WriterCmd::Flush(ack) => waiters.push(ack),
                WriterCmd::Shutdown(ack) => {
                    waiters.push(ack);
                    stop = true;
                    break;
                }
            }
            next = rx.try_recv().ok();
        }

        if let Some(cart) = pending.take() {
            write(storage.as_ref(), &key, &cart).await;
        }
        for ack in waiters.drain(..) {
            let _ = ack.send(());
        }

        if stop {
            break;
        }
    }

    info!(key = %key, "Cart writer stopped");
}

async fn write<S: KeyValueStorage>(storage: &S, key: &str, cart: &Cart) {
    let body = match payload::encode(cart) {
        Ok(body) => body,
        Err(e) => {
            error!(key = %key, error = %e, "Failed to encode cart");
            return;
        }
    };

    match storage.set_item(key, &body).await {
        Ok(()) => debug!(key = %key, items = cart.len(), "Persisted cart"),
        Err(e) => error!(key = %key, error = %e, "Failed to persist cart"),
    }
}
