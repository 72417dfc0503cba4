//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod tracker_dto;

pub use common_dto::*;
pub use tracker_dto::*;
