//! Session data model.
//!
//! These are the values that travel on the session event bus: the lifecycle
//! [`SessionState`], the [`SessionPayload`] snapshot that accompanies most
//! notifications, and [`SessionEvent`], which pairs the two.

use std::fmt;

use crate::error::SessionError;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// A session is running.
    Started,
    /// The running session was interrupted.
    Stopped,
    /// The running session ran to completion.
    Finished,
    /// The finished-session history was cleared.
    Reset,
}

impl SessionState {
    /// Lower-case name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Finished => "finished",
            Self::Reset => "reset",
        }
    }

    /// Whether notifications for this state must carry a payload.
    pub fn requires_payload(self) -> bool {
        matches!(self, Self::Stopped | Self::Finished)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionType {
    /// A work interval.
    #[default]
    Pomodoro,
    /// A short break between work intervals.
    ShortBreak,
    /// A long break after several work intervals.
    LongBreak,
}

impl SessionType {
    /// Lower-case name of the session type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::ShortBreak => "shortbreak",
            Self::LongBreak => "longbreak",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FinishedSession {
    /// Identifier assigned by whoever recorded the session.
    pub id: u32,
    /// Kind of session that finished.
    pub session_type: SessionType,
    /// Length of the session in minutes.
    pub duration_minutes: u32,
}

impl FinishedSession {
    /// Create a finished-session record.
    pub fn new(id: u32, session_type: SessionType, duration_minutes: u32) -> Self {
        Self {
            id,
            session_type,
            duration_minutes,
        }
    }
}

/// Snapshot accompanying a session notification.
///
/// `sessions` is the full finished-session history at the time of emission,
/// in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPayload {
    /// Kind of the current session.
    pub session_type: SessionType,
    /// Every finished session so far.
    pub sessions: Vec<FinishedSession>,
    /// State of the session when the snapshot was taken.
    pub state: SessionState,
    /// Duration of the current session, in seconds.
    pub duration: u32,
    /// Task description attached to the session.
    pub task: String,
}

impl SessionPayload {
    /// Number of finished sessions in the history.
    pub fn finished_count(&self) -> usize {
        self.sessions.len()
    }
}

/// A state notification as delivered to bus subscribers.
///
/// `Stopped` and `Finished` always carry a payload; `Started` and `Reset`
/// may omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session started.
    Started(Option<SessionPayload>),
    /// A session was stopped.
    Stopped(SessionPayload),
    /// A session finished.
    Finished(SessionPayload),
    /// The session history was reset.
    Reset(Option<SessionPayload>),
}

impl SessionEvent {
    /// Pair a state with an optional payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingPayload`] if `state` requires a payload
    /// and none was given.
    pub fn new(state: SessionState, payload: Option<SessionPayload>) -> Result<Self, SessionError> {
        match (state, payload) {
            (SessionState::Started, payload) => Ok(Self::Started(payload)),
            (SessionState::Reset, payload) => Ok(Self::Reset(payload)),
            (SessionState::Stopped, Some(payload)) => Ok(Self::Stopped(payload)),
            (SessionState::Finished, Some(payload)) => Ok(Self::Finished(payload)),
            (state, None) => Err(SessionError::MissingPayload { state }),
        }
    }

    /// The state this event announces.
    pub fn state(&self) -> SessionState {
        match self {
            Self::Started(_) => SessionState::Started,
            Self::Stopped(_) => SessionState::Stopped,
            Self::Finished(_) => SessionState::Finished,
            Self::Reset(_) => SessionState::Reset,
        }
    }

    /// The payload, if one was sent.
    pub fn payload(&self) -> Option<&SessionPayload> {
        match self {
            Self::Started(payload) | Self::Reset(payload) => payload.as_ref(),
            Self::Stopped(payload) | Self::Finished(payload) => Some(payload),
        }
    }
}
