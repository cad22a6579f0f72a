//! LINE webhook payload model and decoding.
//!
//! ## Processing Flow
//!
//! ```text
//! raw body bytes → decode() → Envelope { destination, events[] }
//! ```

pub mod decode;
pub mod types;

pub use decode::{decode, DecodeError};
pub use types::{DeliveryContext, Envelope, Event, EventKind, MessageContent, Source};
