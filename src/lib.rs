// Core layer - shared types and configuration
pub mod core;

// Application layer - command tree, resolution and dispatch
pub mod commands;

// Re-export core config for convenience
pub use core::{Config, RouterError};
