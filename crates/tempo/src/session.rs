//! Session controllers.
//!
//! A [`SessionController`] is what user interaction drives: the session panel
//! forwards button clicks and shortcuts to it, and the controller announces
//! the resulting state changes on the [`SessionEventBus`].
//!
//! [`ManualSession`] is the in-memory controller. It keeps the finished
//! session history and moves through the lifecycle only when told to; there
//! is no timer behind it, so something else calls [`ManualSession::finish`]
//! when a session runs out.

use std::sync::Arc;

use parking_lot::Mutex;
use tempo_core::logging::targets;
use tempo_core::{
    FinishedSession, SessionEvent, SessionEventBus, SessionPayload, SessionState, SessionType,
};

/// The operations the session controls trigger.
///
/// Each returns `true` if the call changed the session.
pub trait SessionController: Send + Sync {
    /// Start a session.
    fn start(&self) -> bool;

    /// Interrupt the running session.
    fn stop(&self) -> bool;

    /// Clear the finished-session history.
    fn reset(&self) -> bool;
}

/// Pomodoros between long breaks.
const LONG_BREAK_INTERVAL: usize = 4;

#[derive(Debug, Default)]
struct SessionData {
    running: bool,
    session_type: SessionType,
    sessions: Vec<FinishedSession>,
    task: String,
}

impl SessionData {
    fn payload(&self, state: SessionState) -> SessionPayload {
        SessionPayload {
            session_type: self.session_type,
            sessions: self.sessions.clone(),
            state,
            duration: duration_minutes(self.session_type) * 60,
            task: self.task.clone(),
        }
    }

    fn next_type(&self) -> SessionType {
        match self.session_type {
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Pomodoro,
            SessionType::Pomodoro => {
                let pomodoros = self
                    .sessions
                    .iter()
                    .filter(|s| s.session_type == SessionType::Pomodoro)
                    .count();
                if pomodoros % LONG_BREAK_INTERVAL == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
        }
    }
}

fn duration_minutes(session_type: SessionType) -> u32 {
    match session_type {
        SessionType::Pomodoro => 25,
        SessionType::ShortBreak => 5,
        SessionType::LongBreak => 15,
    }
}

/// In-memory session controller that announces every change on the bus.
///
/// Calls that make no sense in the current state, such as stopping when
/// nothing runs, are ignored and return `false`.
///
/// ```
/// use std::sync::Arc;
/// use tempo::session::{ManualSession, SessionController};
/// use tempo_core::SessionEventBus;
///
/// let session = ManualSession::new(Arc::new(SessionEventBus::new()));
/// assert!(session.start());
/// assert!(!session.start());
/// assert!(session.finish());
/// assert_eq!(session.sessions().len(), 1);
/// ```
pub struct ManualSession {
    bus: Arc<SessionEventBus>,
    data: Mutex<SessionData>,
}

impl ManualSession {
    /// Create a controller announcing on `bus`.
    pub fn new(bus: Arc<SessionEventBus>) -> Self {
        Self {
            bus,
            data: Mutex::new(SessionData::default()),
        }
    }

    /// Whether a session is running.
    pub fn is_running(&self) -> bool {
        self.data.lock().running
    }

    /// Kind of the current or next session.
    pub fn session_type(&self) -> SessionType {
        self.data.lock().session_type
    }

    /// Finished sessions, oldest first.
    pub fn sessions(&self) -> Vec<FinishedSession> {
        self.data.lock().sessions.clone()
    }

    /// Attach a task description to the following notifications.
    pub fn set_task(&self, task: impl Into<String>) {
        self.data.lock().task = task.into();
    }

    /// Complete the running session and record it in the history.
    pub fn finish(&self) -> bool {
        let payload = {
            let mut data = self.data.lock();
            if !data.running {
                tracing::debug!(target: targets::SESSION, "finish ignored, no session running");
                return false;
            }
            data.running = false;
            let id = data.sessions.len() as u32 + 1;
            let finished =
                FinishedSession::new(id, data.session_type, duration_minutes(data.session_type));
            data.sessions.push(finished);
            let payload = data.payload(SessionState::Finished);
            data.session_type = data.next_type();
            payload
        };

        tracing::info!(
            target: targets::SESSION,
            session_type = %payload.session_type,
            finished = payload.finished_count(),
            "session finished"
        );
        self.bus.emit(SessionEvent::Finished(payload));
        true
    }
}

impl SessionController for ManualSession {
    fn start(&self) -> bool {
        let payload = {
            let mut data = self.data.lock();
            if data.running {
                tracing::debug!(target: targets::SESSION, "start ignored, session already running");
                return false;
            }
            data.running = true;
            data.payload(SessionState::Started)
        };

        tracing::info!(
            target: targets::SESSION,
            session_type = %payload.session_type,
            "session started"
        );
        self.bus.emit(SessionEvent::Started(Some(payload)));
        true
    }

    fn stop(&self) -> bool {
        let payload = {
            let mut data = self.data.lock();
            if !data.running {
                tracing::debug!(target: targets::SESSION, "stop ignored, no session running");
                return false;
            }
            data.running = false;
            data.payload(SessionState::Stopped)
        };

        tracing::info!(
            target: targets::SESSION,
            session_type = %payload.session_type,
            "session stopped"
        );
        self.bus.emit(SessionEvent::Stopped(payload));
        true
    }

    fn reset(&self) -> bool {
        let payload = {
            let mut data = self.data.lock();
            if data.running {
                tracing::debug!(target: targets::SESSION, "reset ignored, session running");
                return false;
            }
            data.sessions.clear();
            data.session_type = SessionType::Pomodoro;
            data.payload(SessionState::Reset)
        };

        tracing::info!(target: targets::SESSION, "session history reset");
        self.bus.emit(SessionEvent::Reset(Some(payload)));
        true
    }
}

impl std::fmt::Debug for ManualSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualSession")
            .field("data", &*self.data.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded() -> (ManualSession, Arc<Mutex<Vec<SessionEvent>>>) {
        let bus = Arc::new(SessionEventBus::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        bus.connect(move |event| events_clone.lock().push(event.clone()));
        (ManualSession::new(bus), events)
    }

    fn states(events: &Mutex<Vec<SessionEvent>>) -> Vec<SessionState> {
        events.lock().iter().map(SessionEvent::state).collect()
    }

    #[test]
    fn test_lifecycle_emits_events() {
        let (session, events) = recorded();
        assert!(session.start());
        assert!(session.stop());
        assert!(session.start());
        assert!(session.finish());
        assert!(session.reset());

        assert_eq!(
            states(&events),
            vec![
                SessionState::Started,
                SessionState::Stopped,
                SessionState::Started,
                SessionState::Finished,
                SessionState::Reset,
            ]
        );
        assert!(session.sessions().is_empty());
    }

    #[test]
    fn test_illegal_calls_are_ignored() {
        let (session, events) = recorded();
        assert!(!session.stop());
        assert!(!session.finish());

        assert!(session.start());
        assert!(!session.start());
        assert!(!session.reset());

        assert_eq!(states(&events), vec![SessionState::Started]);
        assert!(session.is_running());
    }

    #[test]
    fn test_finish_records_history() {
        let (session, events) = recorded();
        session.set_task("write report");
        for _ in 0..2 {
            session.start();
            session.finish();
        }

        let sessions = session.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0], FinishedSession::new(1, SessionType::Pomodoro, 25));
        assert_eq!(sessions[1], FinishedSession::new(2, SessionType::ShortBreak, 5));

        let events = events.lock();
        let Some(SessionEvent::Finished(payload)) = events.last() else {
            panic!("expected a finished event, got {:?}", events.last());
        };
        assert_eq!(payload.finished_count(), 2);
        assert_eq!(payload.state, SessionState::Finished);
        assert_eq!(payload.task, "write report");
    }

    #[test]
    fn test_stop_payload_carries_history() {
        let (session, events) = recorded();
        session.start();
        session.finish();
        session.start();
        session.stop();

        let events = events.lock();
        let Some(SessionEvent::Stopped(payload)) = events.last() else {
            panic!("expected a stopped event, got {:?}", events.last());
        };
        assert_eq!(payload.finished_count(), 1);
        assert_eq!(payload.session_type, SessionType::ShortBreak);
    }

    #[test]
    fn test_long_break_after_interval() {
        let (session, _) = recorded();
        let mut types = Vec::new();
        for _ in 0..8 {
            types.push(session.session_type());
            session.start();
            session.finish();
        }
        assert_eq!(
            types,
            vec![
                SessionType::Pomodoro,
                SessionType::ShortBreak,
                SessionType::Pomodoro,
                SessionType::ShortBreak,
                SessionType::Pomodoro,
                SessionType::ShortBreak,
                SessionType::Pomodoro,
                SessionType::LongBreak,
            ]
        );
    }
}
