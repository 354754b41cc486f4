//! Publication of session lifecycle events
//!
//! The manager announces session creations and refreshes on a broadcast
//! channel. Delivery is best effort: publishing never blocks or fails the
//! operation that triggered it, nothing is redelivered, and a subscriber
//! that falls behind loses the oldest events. Consumers that need durable
//! notification must build it on their own side of the channel.

use flugo_clock::UnixTime;
use tokio::sync::broadcast;

use crate::{BearerToken, SessionContext};

// Subscribers lagging by more than this many events lose the oldest ones.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A lifecycle announcement from the session manager
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A new session was established
    Created {
        /// The admitted bearer token
        token: BearerToken,
        /// When it expires
        expiry: UnixTime,
        /// The context the platform attached
        context: SessionContext,
    },
    /// The current session was renewed or upgraded
    Refreshed {
        /// The bearer token now current, possibly unchanged
        token: BearerToken,
        /// The new expiry
        expiry: UnixTime,
    },
}

#[derive(Debug)]
pub(crate) struct EventSink {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventSink {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        match &event {
            SessionEvent::Created { expiry, .. } => {
                tracing::trace!(expiry = expiry.0, "publishing session created event");
            }
            SessionEvent::Refreshed { expiry, .. } => {
                tracing::trace!(expiry = expiry.0, "publishing session refreshed event");
            }
        }

        // An error here only means nobody is subscribed right now.
        let _ = self.tx.send(event);
    }
}
