//! Utility modules: developer logging, JSON record input, numeric helpers, timestamps.
pub mod devlog;
pub mod json;
pub mod num;
pub mod time;
