//! Error types for Tempo core.

use crate::session::SessionState;

/// Errors raised while building or sending session notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A `stopped` or `finished` notification was sent without a payload.
    #[error("'{state}' notifications must carry a session payload")]
    MissingPayload { state: SessionState },
}

/// A specialized Result type for session notifications.
pub type Result<T> = std::result::Result<T, SessionError>;
