//! Domain layer: match and commentary entities.
//!
//! This module contains the server-side domain model: the match record
//! with its schedule-derived status, and per-match commentary entries.

pub mod commentary;
pub mod match_record;

pub use commentary::Commentary;
pub use match_record::{Match, MatchStatus};
