//! Common utilities shared across the SSO crates.
//!
//! This crate provides:
//! - The credential error taxonomy and its gRPC status mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, BoxError};
