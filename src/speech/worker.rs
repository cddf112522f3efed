//! Speech worker and pipeline lifecycle
//!
//! One dedicated OS thread drains the queue and owns the synthesis device
//! exclusively. Synthesis and playback are blocking calls, so the worker
//! lives off the async runtime; producers talk to it through an unbounded
//! channel that carries the close sentinel alongside narration items.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::speech::backend::SpeechBackend;
use crate::speech::narrator::{NarrationItem, Narrator, QueueItem};
use crate::{Error, Result};

/// How long shutdown waits for queued narration to drain
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Synthesis device lifecycle
enum DeviceState<H> {
    /// Device initialized and usable
    Ready(H),
    /// Initialization or recovery failed; items are dropped
    Failed,
}

/// Owner handle for the speech worker
///
/// Spawns the worker, gates startup on device readiness, and drives an
/// idempotent drain-and-stop shutdown.
pub struct SpeechPipeline {
    narrator: Narrator,
    shutdown: Arc<AtomicBool>,
    ready_rx: Option<oneshot::Receiver<bool>>,
    done_rx: Option<oneshot::Receiver<()>>,
}

impl SpeechPipeline {
    /// Spawn the speech worker thread with the given backend
    ///
    /// # Errors
    ///
    /// Returns error if the worker thread cannot be spawned
    pub fn spawn<B: SpeechBackend>(backend: B) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let shutdown = Arc::new(AtomicBool::new(false));

        std::thread::Builder::new()
            .name("speech-worker".to_string())
            .spawn(move || run_worker(&backend, rx, ready_tx, done_tx))
            .map_err(|e| Error::Speech(format!("failed to spawn speech worker: {e}")))?;

        Ok(Self {
            narrator: Narrator::new(tx, shutdown.clone()),
            shutdown,
            ready_rx: Some(ready_rx),
            done_rx: Some(done_rx),
        })
    }

    /// A pipeline with no worker; all narration is discarded
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            narrator: Narrator::disabled(),
            shutdown: Arc::new(AtomicBool::new(true)),
            ready_rx: None,
            done_rx: None,
        }
    }

    /// Get a producer handle to the narration queue
    #[must_use]
    pub fn narrator(&self) -> Narrator {
        self.narrator.clone()
    }

    /// Wait for the worker to report device readiness, up to `timeout`
    ///
    /// Returns false if the device terminally failed to initialize or the
    /// timeout expired; the caller may proceed in speech-disabled mode.
    pub async fn wait_ready(&mut self, timeout: Duration) -> bool {
        let Some(rx) = self.ready_rx.take() else {
            return false;
        };

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(ready)) => ready,
            Ok(Err(_)) => {
                tracing::error!("speech worker exited before signaling readiness");
                false
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "speech device not ready within timeout, continuing without narration"
                );
                false
            }
        }
    }

    /// Stop accepting narration, drain the queue, and stop the worker
    ///
    /// Idempotent: only the first call acts. The optional farewell is spoken
    /// after the shutdown signal is set, then the close sentinel stops the
    /// worker once the queue has drained. The drain wait is bounded so
    /// shutdown cannot hang on a dead worker.
    pub async fn shutdown(&mut self, farewell: Option<NarrationItem>) {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(item) = farewell {
            self.narrator.push_unchecked(item);
        }
        self.narrator.push_close();

        if let Some(done) = self.done_rx.take() {
            if tokio::time::timeout(DRAIN_TIMEOUT, done).await.is_err() {
                tracing::warn!("speech worker did not drain within timeout");
            }
        }

        tracing::debug!("speech pipeline shut down");
    }
}

/// Worker loop: initialize the device, signal readiness, drain the queue
fn run_worker<B: SpeechBackend>(
    backend: &B,
    mut rx: mpsc::UnboundedReceiver<QueueItem>,
    ready_tx: oneshot::Sender<bool>,
    done_tx: oneshot::Sender<()>,
) {
    let mut device = match backend.init() {
        Ok(handle) => {
            tracing::info!("speech device initialized");
            DeviceState::Ready(handle)
        }
        Err(e) => {
            tracing::error!(error = %e, "speech device failed to initialize");
            DeviceState::Failed
        }
    };

    let _ = ready_tx.send(matches!(device, DeviceState::Ready(_)));

    while let Some(item) = rx.blocking_recv() {
        match item {
            QueueItem::Speak(item) => device = render_item(backend, device, &item),
            QueueItem::Close => break,
        }
    }

    let _ = done_tx.send(());
    tracing::debug!("speech worker exited");
}

/// Render one item, recovering the device on failure
///
/// A render error triggers exactly one reinitialization attempt; the failed
/// item is not replayed. While the device is down, each arriving item gets
/// one fresh initialization attempt before being dropped, so narration
/// resumes as soon as the device comes back.
fn render_item<B: SpeechBackend>(
    backend: &B,
    device: DeviceState<B::Handle>,
    item: &NarrationItem,
) -> DeviceState<B::Handle> {
    let mut handle = match device {
        DeviceState::Ready(handle) => handle,
        DeviceState::Failed => match backend.init() {
            Ok(handle) => {
                tracing::info!("speech device recovered");
                handle
            }
            Err(e) => {
                tracing::debug!(error = %e, text = %item.text, "device unavailable, narration dropped");
                return DeviceState::Failed;
            }
        },
    };

    tracing::trace!(text = %item.text, "speaking");

    match backend.render(&mut handle, &item.text) {
        Ok(()) => {
            if let Some(pause) = item.pause_after {
                backend.pause(pause);
            }
            DeviceState::Ready(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "speech render failed, reinitializing device");
            match backend.init() {
                Ok(handle) => DeviceState::Ready(handle),
                Err(e) => {
                    tracing::error!(error = %e, "speech device reinitialization failed");
                    DeviceState::Failed
                }
            }
        }
    }
}
