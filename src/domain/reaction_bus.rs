//! Broadcast channel for reaction events.
//!
//! [`ReactionBus`] wraps a [`tokio::sync::broadcast`] channel. The chat
//! gateway adapter publishes every reaction-add it receives, and each live
//! vote session holds its own receiver, so independent sessions never
//! contend on one another's state.

use tokio::sync::broadcast;

use super::ReactionEvent;

/// Broadcast bus for [`ReactionEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers; a session that lags logs the gap and keeps listening.
#[derive(Debug, Clone)]
pub struct ReactionBus {
    sender: broadcast::Sender<ReactionEvent>,
}

impl ReactionBus {
    /// Creates a new `ReactionBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a reaction event to all subscribers.
    ///
    /// Returns the number of receivers that received the event. With no
    /// live sessions the event is silently dropped.
    pub fn publish(&self, event: ReactionEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future reactions.
    ///
    /// Each vote session subscribes once, before its task is spawned, so
    /// reactions arriving after `propose` returns are never missed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ReactionEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
