//! Service layer: business logic between REST handlers and persistence.

pub mod match_service;

pub use match_service::MatchService;
