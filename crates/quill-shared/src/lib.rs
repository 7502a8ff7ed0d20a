//! # Quill Shared
//!
//! Request/response types exchanged with the presentation layer.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, MessageResponse};
