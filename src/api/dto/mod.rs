//! Data Transfer Objects for REST request/response serialization.

pub mod commentary_dto;
pub mod match_dto;

pub use commentary_dto::*;
pub use match_dto::*;
