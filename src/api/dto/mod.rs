//! Data Transfer Objects for JSON response serialization.

pub mod stats_dto;

pub use stats_dto::*;
