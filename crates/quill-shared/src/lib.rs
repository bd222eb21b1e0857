//! # Quill Shared
//!
//! Types shared between the backend and any Rust/WASM front end:
//! request/response DTOs and the API response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
