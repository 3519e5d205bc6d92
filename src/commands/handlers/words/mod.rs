//! Word counting in threads and messages
pub mod count;
pub mod message;
