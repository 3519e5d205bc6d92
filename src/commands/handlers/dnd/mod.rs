//! Tabletop helpers
pub mod roll;
