//! lyrics-dl: fetch song lyrics from several unreliable web sources and
//! translate them through a chain of translation services.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod utils;

pub use crate::config::Config;
pub use crate::core::sources::{LyricsResult, SourceManager};
pub use crate::core::translation::{TranslationManager, TranslationResult};
pub use crate::error::{LyricsDlError, Result};
