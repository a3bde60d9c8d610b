//! Core systems for Tempo.
//!
//! This crate provides the foundational pieces of the Tempo session timer UI:
//!
//! - **Signal/Slot System**: Typed, synchronous, ordered notifications
//! - **Property System**: Values that announce their own changes
//! - **Session Model**: Session states, finished-session records, payloads
//! - **Session Event Bus**: The `"session"` topic every component listens on
//!
//! # Session Bus Example
//!
//! ```
//! use tempo_core::{FinishedSession, SessionEventBus, SessionPayload, SessionState, SessionType};
//!
//! let bus = SessionEventBus::new();
//!
//! bus.connect(|event| {
//!     if let Some(payload) = event.payload() {
//!         println!("{} with {} finished sessions", event.state(), payload.finished_count());
//!     }
//! });
//!
//! let payload = SessionPayload {
//!     session_type: SessionType::Pomodoro,
//!     sessions: vec![FinishedSession::new(1, SessionType::Pomodoro, 25)],
//!     state: SessionState::Finished,
//!     duration: 25 * 60,
//!     task: String::new(),
//! };
//! bus.send(SessionState::Finished, Some(payload)).unwrap();
//! ```

pub mod bus;
mod error;
pub mod logging;
pub mod property;
pub mod session;
pub mod signal;

pub use bus::SessionEventBus;
pub use error::{Result, SessionError};
pub use property::Property;
pub use session::{FinishedSession, SessionEvent, SessionPayload, SessionState, SessionType};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
