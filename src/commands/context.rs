//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Reduce to platform handle and help intro
//! - 1.0.0: Initial implementation with core shared state

use serenity::http::Http;
use std::sync::Arc;

/// Shared context for all handlers
///
/// Constructed once at startup and handed to every handler invocation.
/// Handlers treat it as read-only.
#[derive(Clone)]
pub struct CommandContext {
    pub http: Arc<Http>,
    pub help_intro: String,
}

impl CommandContext {
    pub fn new(http: Arc<Http>, help_intro: impl Into<String>) -> Self {
        Self {
            http,
            help_intro: help_intro.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<CommandContext>();
    }

    #[test]
    fn test_new_keeps_intro() {
        let context = CommandContext::new(Arc::new(Http::new("")), "intro");
        assert_eq!(context.help_intro, "intro");
    }
}
