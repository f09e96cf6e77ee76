//! # matchday-gateway
//!
//! REST API and WebSocket gateway for sports match data and live commentary.
//!
//! Match and commentary records are persisted in PostgreSQL and exposed
//! over a conventional REST surface. The core subsystem is the live
//! channel at `/ws`: clients subscribe to match topics and receive
//! commentary events in real time, pushed by the write path after each
//! commit.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Upgrade + Connections (ws/)
//!     │
//!     ├── MatchService (service/)
//!     ├── LiveHub: registry, subscriptions, fanout (ws/)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
