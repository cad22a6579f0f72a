//! LINE webhook receiver.
//!
//! Accepts signed webhook callbacks from the LINE Messaging API,
//! verifies them against the channel secret and reports each
//! follow / unfollow / message event to an [`EventReporter`].
//!
//! ## Architecture
//!
//! ```text
//! POST /webhook → signature::verify → webhook::decode → process::dispatch → EventReporter
//! ```

pub mod config;
pub mod process;
pub mod util;
pub mod web;
pub mod webhook;

// Re-export commonly used types
pub use config::Config;
pub use process::{dispatch, EventReporter, Signal, SignalKind, TracingReporter};
pub use web::{router, AppState};
pub use webhook::{decode, DecodeError, Envelope, Event, EventKind, Source};
