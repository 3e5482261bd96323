//! Protocol module containing the JSON envelopes of the real-time channel.

pub mod messages;

pub use messages::*;
