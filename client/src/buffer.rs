use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use danmaku_protocol::ChatMessage;

/// FIFO of extracted chat messages shared between the session and callers.
///
/// Cloning gives another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    inner: Arc<Mutex<VecDeque<ChatMessage>>>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: ChatMessage) {
        self.lock().push_back(message);
    }

    /// Remove the oldest message, or `None` if nothing is queued. Never blocks
    /// waiting for a message.
    pub fn pop_front(&self) -> Option<ChatMessage> {
        self.lock().pop_front()
    }

    /// Take every queued message, oldest first
    pub fn drain(&self) -> Vec<ChatMessage> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere while holding the lock leaves the queue intact.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ChatMessage>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
