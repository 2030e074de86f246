//! Signal derivation and notification.
//!
//! Data flows one way each round:
//! price series → [`indicators`] → [`frame::IndicatorFrame`] →
//! [`classifier`] → [`dedup`] → [`message`] + notifier.
//!
//! [`scheduler::PollScheduler`] drives the loop and owns the dedup state;
//! [`config`] turns the environment and an optional TOML file into the
//! scheduler's settings.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod errors;
pub mod frame;
pub mod indicators;
pub mod message;
pub mod scheduler;
pub mod shutdown;

pub use classifier::{Direction, SignalDecision, SignalMode};
pub use errors::EngineError;
pub use scheduler::{Instrument, InstrumentOutcome, PollScheduler, RoundReport};
pub use shutdown::ShutdownToken;
