//! Persistence layer: PostgreSQL storage for matches and commentary.
//!
//! The concrete implementation uses `sqlx::PgPool` for async PostgreSQL
//! access. Row types live in [`models`] and are converted into domain
//! entities at the store boundary.

pub mod models;
pub mod postgres;

pub use postgres::MatchStore;
