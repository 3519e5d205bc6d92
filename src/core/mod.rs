//! # Core Module
//!
//! Configuration, error types and reply text utilities shared by the router.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add RouterError for load and registration failures
//! - 1.1.0: Add response module with Discord message chunking utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::RouterError;
pub use response::{chunk_text, truncate_for_message, MESSAGE_LIMIT};
