//! Core types and run wiring for binday, the next-day waste collection notifier.

/// Injectable source of "today".
pub mod clock;
/// JSON configuration file handling.
pub mod config;
/// Fan-out of a notification over the enabled channels.
pub mod dispatch;
/// Domain models shared by the schedule client and the channels.
pub mod model;
/// Traits describing the schedule and notification backends.
pub mod ports;
/// The single-shot run state machine.
pub mod service;

pub use clock::*;
pub use config::*;
pub use dispatch::*;
pub use model::*;
pub use ports::*;
pub use service::*;
