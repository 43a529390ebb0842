//! Utility modules for common functionality
//!
//! - `logging`: tracing subscriber setup
//! - `progress`: spinners and messages for CLI feedback

pub mod logging;
pub mod progress;
