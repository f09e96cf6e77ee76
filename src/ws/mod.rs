//! Live channel: WebSocket upgrade, connection handling, and fanout.
//!
//! The WebSocket endpoint at `/ws` pushes match and commentary events to
//! subscribed clients. [`LiveHub`] owns all connection state; the write
//! path calls its broadcast entry points after a commit.

pub mod connection;
pub mod handler;
pub mod hub;
pub mod messages;

pub use hub::{ConnId, LiveHub};
