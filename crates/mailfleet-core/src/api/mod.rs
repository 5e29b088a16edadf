//! REST client for the fleet backend.
//!
//! The backend owns all state; this module only issues JSON requests and
//! maps transport, status and decode failures onto [`ApiError`].

pub mod client;
pub mod errors;
pub mod timestamps;

pub use client::{ApiClient, ApiPath};
pub use errors::ApiError;
