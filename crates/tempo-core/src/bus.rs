//! Session event bus.
//!
//! [`SessionEventBus`] is the synchronous publish/subscribe channel that
//! carries session lifecycle notifications on the `"session"` topic. Any
//! component may send on it or subscribe to it. Delivery happens on the
//! calling thread, in subscription order, before [`send`](SessionEventBus::send)
//! returns; nothing is queued.
//!
//! The bus is an ordinary object. The application root owns it and hands out
//! `Arc<SessionEventBus>` to the components that need it; tests build a fresh
//! bus per scenario or call [`reset`](SessionEventBus::reset).
//!
//! # Example
//!
//! ```
//! use tempo_core::{SessionEventBus, SessionState};
//!
//! let bus = SessionEventBus::new();
//! bus.connect(|event| println!("session {}", event.state()));
//! bus.send(SessionState::Started, None).unwrap();
//! ```

use crate::error::Result;
use crate::logging::targets;
use crate::session::{SessionEvent, SessionPayload, SessionState};
use crate::signal::{ConnectionGuard, ConnectionId, Signal};

/// Synchronous many-subscriber channel for session notifications.
pub struct SessionEventBus {
    signal: Signal<SessionEvent>,
}

impl SessionEventBus {
    /// The topic this bus carries.
    pub const TOPIC: &'static str = "session";

    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Register a subscriber.
    pub fn connect<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = self.signal.connect(subscriber);
        tracing::debug!(
            target: targets::BUS,
            topic = Self::TOPIC,
            subscribers = self.signal.connection_count(),
            "subscriber connected"
        );
        id
    }

    /// Register a subscriber that is removed when the guard is dropped.
    pub fn connect_scoped<F>(&self, subscriber: F) -> ConnectionGuard<SessionEvent>
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.signal.connect_scoped(subscriber)
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.signal.disconnect(id)
    }

    /// Remove every subscriber.
    pub fn reset(&self) {
        tracing::debug!(
            target: targets::BUS,
            topic = Self::TOPIC,
            removed = self.signal.connection_count(),
            "bus reset"
        );
        self.signal.disconnect_all();
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.signal.connection_count()
    }

    /// Send a state notification to every subscriber.
    ///
    /// # Errors
    ///
    /// Fails without delivering anything if `state` is `stopped` or
    /// `finished` and no payload is given.
    pub fn send(&self, state: SessionState, payload: Option<SessionPayload>) -> Result<()> {
        let event = SessionEvent::new(state, payload)?;
        self.emit(event);
        Ok(())
    }

    /// Deliver an already-built event to every subscriber.
    ///
    /// Returns the number of subscribers that received it.
    pub fn emit(&self, event: SessionEvent) -> usize {
        tracing::debug!(
            target: targets::BUS,
            topic = Self::TOPIC,
            state = %event.state(),
            "sending session notification"
        );
        self.signal.emit(event)
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("topic", &Self::TOPIC)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::SessionError;
    use crate::session::{FinishedSession, SessionType};

    fn payload() -> SessionPayload {
        SessionPayload {
            session_type: SessionType::Pomodoro,
            sessions: vec![FinishedSession::new(1, SessionType::Pomodoro, 10)],
            state: SessionState::Stopped,
            duration: 600,
            task: "write report".to_string(),
        }
    }

    fn recorder(bus: &SessionEventBus) -> (ConnectionId, Arc<Mutex<Vec<SessionState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = bus.connect(move |event| seen_clone.lock().push(event.state()));
        (id, seen)
    }

    #[test]
    fn test_send_delivers_before_returning() {
        let bus = SessionEventBus::new();
        let (_, seen) = recorder(&bus);

        bus.send(SessionState::Started, None).unwrap();
        assert_eq!(*seen.lock(), vec![SessionState::Started]);

        bus.send(SessionState::Stopped, Some(payload())).unwrap();
        assert_eq!(*seen.lock(), vec![SessionState::Started, SessionState::Stopped]);
    }

    #[test]
    fn test_subscribers_called_in_registration_order() {
        let bus = SessionEventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = order.clone();
            bus.connect(move |_| order.lock().push(name));
        }

        bus.send(SessionState::Reset, None).unwrap();
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_payload_is_rejected_before_delivery() {
        let bus = SessionEventBus::new();
        let (_, seen) = recorder(&bus);

        let err = bus.send(SessionState::Finished, None).unwrap_err();
        assert_eq!(
            err,
            SessionError::MissingPayload {
                state: SessionState::Finished
            }
        );
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_payload_reaches_subscriber() {
        let bus = SessionEventBus::new();
        let tasks = Arc::new(Mutex::new(Vec::new()));
        let tasks_clone = tasks.clone();
        bus.connect(move |event| {
            if let Some(payload) = event.payload() {
                tasks_clone.lock().push(payload.task.clone());
            }
        });

        bus.send(SessionState::Stopped, Some(payload())).unwrap();
        assert_eq!(*tasks.lock(), vec!["write report".to_string()]);
    }

    #[test]
    fn test_disconnect_and_reset() {
        let bus = SessionEventBus::new();
        let (first, first_seen) = recorder(&bus);
        let (_, second_seen) = recorder(&bus);
        assert_eq!(bus.subscriber_count(), 2);

        assert!(bus.disconnect(first));
        bus.send(SessionState::Started, None).unwrap();
        assert!(first_seen.lock().is_empty());
        assert_eq!(second_seen.lock().len(), 1);

        bus.reset();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.emit(SessionEvent::Reset(None)), 0);
        assert_eq!(second_seen.lock().len(), 1);
    }

    #[test]
    fn test_scoped_subscriber() {
        let bus = SessionEventBus::new();
        {
            let _guard = bus.connect_scoped(|_| {});
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }
}
