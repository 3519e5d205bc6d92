//! Typed failures of the command router
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use thiserror::Error;

/// Failures that abort a startup step.
///
/// Resolution misses and handler failures are not represented here: they are
/// reported back on the interaction that caused them and never leave the
/// per-event boundary.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A command location could not be listed while building the tree
    #[error("could not list command location '{location}': {reason}")]
    Load { location: String, reason: String },

    /// The registration API rejected the descriptor batch for a scope
    #[error("command registration rejected for scope {scope}: {reason}")]
    Registration { scope: u64, reason: String },

    /// A required environment variable was not set
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),
}

impl RouterError {
    pub fn load(location: &[String], reason: impl ToString) -> Self {
        RouterError::Load {
            location: location.join("/"),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_location() {
        let err = RouterError::load(&["dnd".to_string(), "spells".to_string()], "gone");
        assert_eq!(
            err.to_string(),
            "could not list command location 'dnd/spells': gone"
        );
    }

    #[test]
    fn test_root_location_renders_empty() {
        let err = RouterError::load(&[], "unreadable");
        assert!(err.to_string().contains("''"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = RouterError::MissingConfig("DISCORD_TOKEN").into();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }
}
