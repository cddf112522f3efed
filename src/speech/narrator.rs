//! Narration queue producer handle

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

/// One unit of text scheduled for speech output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationItem {
    /// Text to speak
    pub text: String,

    /// Suggested pause after speaking, for pacing between lines
    pub pause_after: Option<Duration>,
}

impl NarrationItem {
    /// Create a narration item with no pacing hint
    #[must_use = "narration items do nothing until queued"]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pause_after: None,
        }
    }

    /// Create a narration item followed by a pacing pause
    #[must_use = "narration items do nothing until queued"]
    pub fn paced(text: impl Into<String>, pause: Duration) -> Self {
        Self {
            text: text.into(),
            pause_after: Some(pause),
        }
    }
}

/// What travels on the speech queue
#[derive(Debug)]
pub(crate) enum QueueItem {
    /// Render this narration item
    Speak(NarrationItem),
    /// Drain sentinel: stop the worker
    Close,
}

/// Cloneable producer handle to the speech queue
///
/// `say` is fire-and-forget: it never blocks, and failures are logged rather
/// than surfaced, so narration can never change the outcome of the operation
/// that requested it. Once the pipeline shuts down every call becomes a
/// silent no-op.
#[derive(Clone)]
pub struct Narrator {
    tx: mpsc::UnboundedSender<QueueItem>,
    shutdown: Arc<AtomicBool>,
}

impl Narrator {
    pub(crate) const fn new(
        tx: mpsc::UnboundedSender<QueueItem>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self { tx, shutdown }
    }

    /// A narrator whose output is discarded (speech-disabled mode)
    #[must_use]
    pub fn disabled() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self {
            tx,
            shutdown: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Queue a single line for narration
    pub fn say(&self, text: impl Into<String>) {
        self.push(NarrationItem::new(text));
    }

    /// Queue a single line followed by a pacing pause
    pub fn say_paced(&self, text: impl Into<String>, pause: Duration) {
        self.push(NarrationItem::paced(text, pause));
    }

    /// Queue an ordered sequence of narration items
    pub fn narrate(&self, items: Vec<NarrationItem>) {
        for item in items {
            self.push(item);
        }
    }

    fn push(&self, item: NarrationItem) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }

        if self.tx.send(QueueItem::Speak(item)).is_err() {
            tracing::warn!("speech queue closed, narration dropped");
        }
    }

    /// Queue an item past the shutdown flag (final farewell during shutdown)
    pub(crate) fn push_unchecked(&self, item: NarrationItem) {
        if self.tx.send(QueueItem::Speak(item)).is_err() {
            tracing::debug!("speech worker already gone, farewell dropped");
        }
    }

    /// Queue the close sentinel
    pub(crate) fn push_close(&self) {
        if self.tx.send(QueueItem::Close).is_err() {
            tracing::debug!("speech worker already gone");
        }
    }
}
