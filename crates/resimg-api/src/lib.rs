//! resimg API Library
//!
//! This crate provides the HTTP handlers, authorization middleware, and
//! application setup around the image store.

mod handlers;
pub mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
