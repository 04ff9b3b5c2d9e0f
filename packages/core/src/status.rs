//! Status notifications.
//!
//! Every operation reports a progress message when it starts and a terminal
//! message when it ends. The sink is the only side channel besides returned
//! values and the collection itself.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::info;

/// Receiver of human-readable progress and result messages.
pub trait StatusSink: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Sink that writes every message to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn notify(&self, message: &str) {
        info!(target: "restcrud::status", "{}", message);
    }
}

/// Sink that buffers messages until they are drained.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all buffered messages.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all buffered messages.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl StatusSink for RecordingSink {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Sink that forwards only while the target is still alive.
///
/// In-flight requests are never cancelled, so a notification may arrive after
/// the view that started the operation is gone. Holding the view's sink
/// weakly turns those late notifications into no-ops.
pub struct WeakSink<S: ?Sized> {
    target: Weak<S>,
}

impl<S: ?Sized> Clone for WeakSink<S> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for WeakSink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSink")
            .field("alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

impl<S: StatusSink + ?Sized> WeakSink<S> {
    pub fn new(target: &Arc<S>) -> Self {
        Self {
            target: Arc::downgrade(target),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl<S: StatusSink + ?Sized> StatusSink for WeakSink<S> {
    fn notify(&self, message: &str) {
        if let Some(target) = self.target.upgrade() {
            target.notify(message);
        }
    }
}
